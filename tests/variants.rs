use twolevel::*;
use twolevel::workload::*;

fn config() -> PredictorConfig {
    PredictorConfig {
        history_bits: 3,
        counter_bits: 2,
        address_bits: 8,
        set_bits: 3,
        ..Default::default()
    }
}

/// Run a workload through a fresh predictor, returning every prediction.
fn replay(variant: Variant, steps: usize, seed: u64)
    -> (Vec<Outcome>, TwoLevelPredictor)
{
    let mut p = config().build(variant).unwrap();
    let mut predictions = Vec::new();
    for (inst, outcome) in Workload::mixed(8, seed).take(steps) {
        predictions.push(p.predict(&inst).unwrap());
        p.update(&inst, outcome).unwrap();
    }
    (predictions, p)
}

#[test]
fn fresh_predictors_predict_not_taken() {
    for variant in Variant::ALL {
        let mut p = config().build(variant).unwrap();
        for pc in [0x00, 0x3c, 0xff] {
            let inst = BranchInstruction::new(pc, 8);
            assert_eq!(p.predict(&inst).unwrap(), Outcome::N, "{}", variant);
        }
    }
}

#[test]
fn replay_is_deterministic() {
    for variant in Variant::ALL {
        let (a, pa) = replay(variant, 2000, 11);
        let (b, pb) = replay(variant, 2000, 11);
        assert_eq!(a, b, "{}", variant);
        assert_eq!(pa.monitor(), pb.monitor(), "{}", variant);
        assert!(pa.pht().iter().eq(pb.pht().iter()), "{}", variant);
    }
}

#[test]
fn monitor_does_not_change_behavior() {
    for variant in Variant::ALL {
        let (expected, _) = replay(variant, 500, 3);

        let mut p = config().build(variant).unwrap();
        let mut predictions = Vec::new();
        for (inst, outcome) in Workload::mixed(8, 3).take(500) {
            let _ = p.monitor();
            predictions.push(p.predict(&inst).unwrap());
            let _ = p.monitor();
            p.update(&inst, outcome).unwrap();
        }
        assert_eq!(predictions, expected, "{}", variant);
    }
}

#[test]
fn biased_branches_are_learned() {
    for variant in Variant::ALL {
        let mut p = config().build(variant).unwrap();
        let workload = Workload::new(8, 0)
            .with_branch(0x21, BranchPattern::AlwaysTaken);
        let mut last = Outcome::N;
        for (inst, outcome) in workload.take(16) {
            last = p.predict(&inst).unwrap();
            p.update(&inst, outcome).unwrap();
        }
        assert_eq!(last, Outcome::T, "{}", variant);
    }
}

#[test]
fn gag_scenario() {
    let cfg = PredictorConfig {
        history_bits: 2,
        counter_bits: 2,
        ..Default::default()
    };
    let mut p = cfg.build(Variant::GAg).unwrap();
    let inst = BranchInstruction::new(0x80, cfg.address_bits);

    use Outcome::*;
    for outcome in [T, T, N, T] {
        assert_eq!(p.predict(&inst).unwrap(), N);
        p.update(&inst, outcome).unwrap();
    }

    let table: Vec<(String, String)> = p.pht().iter()
        .map(|(k, v)| (render(k), render(v)))
        .collect();
    let expected = [("00", "01"), ("01", "01"), ("10", "01"), ("11", "00")];
    assert_eq!(table.len(), expected.len());
    for ((k, v), (ek, ev)) in table.iter().zip(expected) {
        assert_eq!((k.as_str(), v.as_str()), (ek, ev));
    }
}

#[test]
fn invalid_configurations() {
    let zero = PredictorConfig { history_bits: 0, ..config() };
    let wide = PredictorConfig { set_bits: 9, ..config() };
    for variant in Variant::ALL {
        assert!(matches!(zero.build(variant),
            Err(PredictorError::ZeroWidth { field: "history_bits" })
        ));
        assert!(matches!(wide.build(variant),
            Err(PredictorError::SelectorTooWide { selector: 9, address: 8 })
        ));
    }
}
