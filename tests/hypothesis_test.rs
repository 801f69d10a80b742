//! Cross-checks of the hypothesis-test engine against known statistical
//! identities and reference values

use ensayo::effect::cohens_d;
use ensayo::hypothesis::{one_way_anova, two_way_anova, welch_t_test, Observation};
use ensayo::outcome::SkipReason;

// =============================================================================
// Welch's t-test
// =============================================================================

#[test]
fn identical_samples_are_indistinguishable() {
    let sample = [5.0, 7.0, 9.0, 11.0, 13.0];
    let test = welch_t_test(&sample, &sample);
    let test = test.as_computed().unwrap();
    assert!(test.t.abs() < 1e-12);
    assert!((test.p_value - 1.0).abs() < 1e-9);
}

#[test]
fn welch_matches_reference_values() {
    // scipy.stats.ttest_ind([2,4,6], [10,12,14], equal_var=False)
    let test = welch_t_test(&[2.0, 4.0, 6.0], &[10.0, 12.0, 14.0]);
    let test = test.as_computed().unwrap();
    assert!((test.t + 4.898_979_485_566_356).abs() < 1e-9);
    assert!((test.df - 4.0).abs() < 1e-9);
    assert!(test.p_value > 0.005 && test.p_value < 0.012);
}

#[test]
fn welch_requires_two_observations_per_sample() {
    let outcome = welch_t_test(&[1.0], &[2.0, 3.0, 4.0]);
    assert!(matches!(
        outcome.skip_reason(),
        Some(SkipReason::InsufficientData(_))
    ));
}

// =============================================================================
// Effect size
// =============================================================================

#[test]
fn cohens_d_reference_value() {
    // means 4 and 12, pooled sd exactly 2
    let effect = cohens_d(&[2.0, 4.0, 6.0], &[10.0, 12.0, 14.0]);
    let effect = effect.as_computed().unwrap();
    assert!((effect.d + 4.0).abs() < 1e-12);
}

#[test]
fn cohens_d_degenerate_is_not_infinite() {
    let outcome = cohens_d(&[3.0, 3.0], &[4.0, 4.0]);
    assert!(matches!(
        outcome.skip_reason(),
        Some(SkipReason::Degenerate(_))
    ));
}

// =============================================================================
// One-way ANOVA
// =============================================================================

#[test]
fn two_group_anova_equals_squared_pooled_t() {
    // For k = 2, F = t² where t is the pooled-variance (not Welch) statistic
    let a = [12.0, 15.0, 11.0, 18.0];
    let b = [22.0, 25.0, 19.0];

    let anova = one_way_anova(&[&a, &b]);
    let anova = anova.as_computed().unwrap();

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    let ss = |v: &[f64]| {
        let m = mean(v);
        v.iter().map(|x| (x - m).powi(2)).sum::<f64>()
    };
    let pooled_var = (ss(&a) + ss(&b)) / (n1 + n2 - 2.0);
    let t = (mean(&a) - mean(&b)) / (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();

    assert!((anova.f - t * t).abs() < 1e-9);
}

#[test]
fn anova_detects_separated_groups() {
    let a = [1.0, 2.0, 3.0];
    let b = [11.0, 12.0, 13.0];
    let c = [21.0, 22.0, 23.0];
    let anova = one_way_anova(&[&a, &b, &c]);
    let anova = anova.as_computed().unwrap();
    assert!(anova.p_value < 0.001);
    assert!((anova.df_between - 2.0).abs() < f64::EPSILON);
    assert!((anova.df_within - 6.0).abs() < f64::EPSILON);
}

#[test]
fn anova_with_empty_group_is_insufficient() {
    let a = [1.0, 2.0];
    let empty: [f64; 0] = [];
    let outcome = one_way_anova(&[&a, &empty]);
    assert!(matches!(
        outcome.skip_reason(),
        Some(SkipReason::InsufficientData(_))
    ));
}

// =============================================================================
// Two-way factorial ANOVA
// =============================================================================

fn balanced_design(per_cell: usize) -> Vec<Observation> {
    let mut observations = Vec::new();
    for (ai, a) in ["individual", "team"].iter().enumerate() {
        for (bi, b) in ["m1", "m2", "m3"].iter().enumerate() {
            for k in 0..per_cell {
                // distinct cell means plus within-cell spread
                let value = 10.0 * ai as f64 + 3.0 * bi as f64 + k as f64;
                observations.push(Observation::new(*a, *b, value));
            }
        }
    }
    observations
}

#[test]
fn balanced_two_way_sums_are_additive() {
    let anova = two_way_anova("mode", "model", &balanced_design(4));
    let anova = anova.as_computed().unwrap();
    let decomposed = anova.factor_a.ss + anova.factor_b.ss + anova.interaction.ss + anova.ss_error;
    assert!((decomposed - anova.ss_total).abs() < 1e-9);
    assert!(!anova.unbalanced);
}

#[test]
fn additive_design_has_no_interaction() {
    // Values built as pure main effects: interaction SS must vanish
    let anova = two_way_anova("mode", "model", &balanced_design(3));
    let anova = anova.as_computed().unwrap();
    assert!(anova.interaction.ss.abs() < 1e-9);
    assert!(anova.factor_a.p_value < 0.001);
    assert!(anova.factor_b.p_value < 0.001);
}

#[test]
fn empty_cell_is_reported_inestimable() {
    let mut observations = balanced_design(2);
    observations.retain(|o| !(o.a == "team" && o.b == "m3"));
    let outcome = two_way_anova("mode", "model", &observations);
    match outcome.skip_reason() {
        Some(SkipReason::Inestimable(detail)) => {
            assert!(detail.contains("team"));
            assert!(detail.contains("m3"));
        }
        other => panic!("expected inestimable interaction, got {other:?}"),
    }
}

#[test]
fn degrees_of_freedom_follow_the_design() {
    let anova = two_way_anova("mode", "model", &balanced_design(4));
    let anova = anova.as_computed().unwrap();
    // a=2, b=3, N=24
    assert!((anova.factor_a.df - 1.0).abs() < f64::EPSILON);
    assert!((anova.factor_b.df - 2.0).abs() < f64::EPSILON);
    assert!((anova.interaction.df - 2.0).abs() < f64::EPSILON);
    assert!((anova.df_error - 18.0).abs() < f64::EPSILON);
}
