//! Knuth-Yao die: simulate a fair six-sided die with a fair coin and check it

use pmc::{
    ComparisonType, CheckError, Dtmc, DtmcStepSolver, MatrixBuilder, Model, ModelChecker,
    NoBoundOperator, PathFormula, RewardFormula, StateFormula, StateLabeling,
};

const FACES: [&str; 6] = ["one", "two", "three", "four", "five", "six"];

fn build_die() -> Result<Dtmc<f64>, CheckError> {
    let coin_states = [
        [1, 2],
        [3, 4],
        [5, 6],
        [1, 7],
        [8, 9],
        [10, 11],
        [2, 12],
    ];

    let mut builder = MatrixBuilder::new().with_dimensions(13, 13, 20);
    for (state, successors) in coin_states.iter().enumerate() {
        for &successor in successors {
            builder.add_next_value(state, successor, 0.5)?;
        }
    }
    for outcome in 7..13 {
        builder.add_next_value(outcome, outcome, 1.0)?;
    }

    let mut labeling = StateLabeling::new(13);
    labeling.add_label_to_state("init", 0)?;
    for (face, state) in FACES.into_iter().zip(7..13) {
        labeling.add_label_to_state(face, state)?;
        labeling.add_label_to_state("done", state)?;
    }

    // One coin flip per step until a face is shown
    let flips = (0..13).map(|s| if s < 7 { 1.0 } else { 0.0 }).collect();
    Dtmc::new(builder.build()?, labeling)?.with_state_rewards(flips)
}

fn main() -> Result<(), CheckError> {
    let die = build_die()?;
    println!("Knuth-Yao die");
    println!("   States: {}", die.state_count());
    println!("   Transitions: {}", die.transition_count());
    println!(
        "   Matrix size: {} bytes",
        die.transition_matrix().size_in_memory()
    );

    let model: &dyn Model<f64> = &die;
    let checker = ModelChecker::new(model, DtmcStepSolver::new());

    println!("\nProbability of rolling one within k steps:");
    for steps in [3, 5, 10, 20] {
        let formula = NoBoundOperator::Probabilistic(PathFormula::bounded_eventually(
            StateFormula::ap("one"),
            steps,
        ));
        if let Some(result) = checker.check_no_bound(&formula) {
            for (state, value) in result {
                println!("   {formula}  state {state}: {value:.6}");
            }
        }
    }

    let expected_flips = NoBoundOperator::Reward(RewardFormula::Cumulative { steps: 50 });
    if let Some(result) = checker.check_no_bound(&expected_flips) {
        for (state, value) in result {
            println!("\nExpected coin flips ({expected_flips}) from state {state}: {value:.4}");
        }
    }

    let terminates = StateFormula::probability_bound(
        ComparisonType::GreaterEqual,
        0.99,
        PathFormula::bounded_eventually(StateFormula::ap("done"), 20),
    );
    if let Some(result) = checker.check(&terminates) {
        for (state, holds) in result {
            println!("{terminates} in state {state}: {holds}");
        }
    }

    Ok(())
}
