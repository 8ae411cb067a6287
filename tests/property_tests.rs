//! Property-based tests for evaluation order, combinator truth and the
//! variable store.

use proptest::prelude::*;
use tickwork::condition::{And, Condition, Nand, Or, Predicate};
use tickwork::machine::{MachineBuilder, MachineContext, TransitionBuilder};
use tickwork::variable::VariableScope;

fn boxed(values: &[bool]) -> Vec<Box<dyn Condition>> {
    values
        .iter()
        .map(|&v| {
            Box::new(Predicate::new(format!("const({v})"), move |_| v)) as Box<dyn Condition>
        })
        .collect()
}

fn ctx() -> MachineContext {
    MachineContext::detached("prop")
}

proptest! {
    #[test]
    fn and_is_satisfied_iff_all_are(values in prop::collection::vec(any::<bool>(), 0..8)) {
        let mut and = And::new(boxed(&values));
        prop_assert_eq!(and.is_satisfied(&mut ctx()), values.iter().all(|&v| v));
    }

    #[test]
    fn or_is_satisfied_iff_any_is(values in prop::collection::vec(any::<bool>(), 2..8)) {
        let mut or = Or::new(boxed(&values)).unwrap();
        prop_assert_eq!(or.is_satisfied(&mut ctx()), values.iter().any(|&v| v));
    }

    #[test]
    fn nand_always_negates_and(values in prop::collection::vec(any::<bool>(), 0..8)) {
        let mut and = And::new(boxed(&values));
        let mut nand = Nand::new(boxed(&values));
        let mut c = ctx();
        prop_assert_eq!(nand.is_satisfied(&mut c), !and.is_satisfied(&mut c));
    }

    /// Whatever the guard pattern, the first satisfied transition in
    /// declaration order fires and nothing else does.
    #[test]
    fn first_satisfied_transition_wins(guards in prop::collection::vec(any::<bool>(), 1..6)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let mut builder = MachineBuilder::new("fanout").state("Source");
            for i in 0..guards.len() {
                builder = builder.state(format!("T{i}"));
            }
            builder = builder.initial("Source");
            for (i, &guard) in guards.iter().enumerate() {
                builder = builder.transition(
                    "Source",
                    TransitionBuilder::new()
                        .when(Predicate::new(format!("g{i}"), move |_| guard))
                        .to(format!("T{i}")),
                );
            }

            let mut machine = builder.build().unwrap();
            machine.start().unwrap();
            let changes = machine.tick().await.unwrap();

            match guards.iter().position(|&g| g) {
                Some(first) => {
                    assert_eq!(changes.len(), 1);
                    assert_eq!(changes[0].from, "Source");
                    assert_eq!(changes[0].to, format!("T{first}"));
                }
                None => {
                    assert!(changes.is_empty());
                    assert_eq!(machine.active_state(), "Source");
                }
            }
        });
    }

    /// A chained run records a history whose records link end to end.
    #[test]
    fn history_records_link_consecutively(hops in 1usize..10) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let mut builder = MachineBuilder::new("chain")
                .allow_chained_transitions(true);
            for i in 0..=hops {
                builder = builder.state(format!("S{i}"));
            }
            builder = builder.initial("S0");
            for i in 0..hops {
                builder = builder.transition(
                    format!("S{i}"),
                    TransitionBuilder::new().to(format!("S{}", i + 1)),
                );
            }

            let mut machine = builder.build().unwrap();
            machine.start().unwrap();
            let changes = machine.tick().await.unwrap();
            assert_eq!(changes.len(), hops);

            let records = machine.history().records();
            assert_eq!(records[0].from, "S0");
            for pair in records.windows(2) {
                assert_eq!(pair[0].to, pair[1].from);
            }
            assert_eq!(machine.history().path().len(), hops + 1);
        });
    }

    #[test]
    fn int_cells_round_trip(value in any::<i64>()) {
        let mut scope = VariableScope::new();
        let cell = scope.define("cell", 0i64).unwrap();
        scope.write(&cell, value);
        prop_assert_eq!(scope.read(&cell), value);
    }

    #[test]
    fn float_cells_round_trip(value in prop::num::f64::NORMAL) {
        let mut scope = VariableScope::new();
        let cell = scope.define("cell", 0.0f64).unwrap();
        scope.write(&cell, value);
        prop_assert_eq!(scope.read(&cell), value);
    }

    /// Reading a name nobody defined registers it and yields the zero
    /// value for its type, whatever the name.
    #[test]
    fn undefined_int_reads_are_zero(name in "[a-z_]{1,16}") {
        let mut scope = VariableScope::new();
        let cell = scope.get::<i64>(&name).unwrap();
        prop_assert_eq!(scope.read(&cell), 0);
        prop_assert!(scope.contains(&name));
    }

    #[test]
    fn redefining_any_name_is_rejected(name in "[a-z_]{1,16}") {
        let mut scope = VariableScope::new();
        scope.define(&name, true).unwrap();
        prop_assert!(scope.define(&name, false).is_err());
        prop_assert!(scope.define(&name, 0i64).is_err());
    }
}
