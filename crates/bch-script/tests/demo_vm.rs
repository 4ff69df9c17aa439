//! A minimal demo instruction set over its own state type, proving the
//! runtime is instruction-set-generic: the same dispatch loop and
//! clone/step/debug discipline drive a number-stack toy machine.

use bch_script::vm::{InstructionSet, Machine, MinimumState, Operator, Rendering};

const OP_ZERO: u8 = 0;
const OP_INC: u8 = 1;
const OP_DEC: u8 = 2;
const OP_ADD: u8 = 3;
const OP_CODESEP: u8 = 171;

#[derive(Clone, Debug, PartialEq, Eq)]
struct DemoState {
    ip: usize,
    script: Vec<u8>,
    stack: Vec<i64>,
}

impl DemoState {
    fn new(script: Vec<u8>) -> Self {
        DemoState {
            ip: 0,
            script,
            stack: Vec::new(),
        }
    }
}

impl MinimumState for DemoState {
    fn ip(&self) -> usize {
        self.ip
    }

    fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    fn script(&self) -> &[u8] {
        &self.script
    }
}

fn demo_machine() -> Machine<DemoState> {
    let undefined = Operator::new(
        Rendering::fixed("UNDEFINED"),
        Rendering::fixed("Skip an unrecognized instruction."),
        |_state: &mut DemoState| {},
    );

    let mut set = InstructionSet::new(
        |state: &mut DemoState| state.ip += 1,
        |state: &DemoState| state.ip < state.script.len(),
        undefined,
    );

    set.define(
        OP_ZERO,
        Operator::new(
            Rendering::fixed("ZERO"),
            Rendering::fixed("Push 0 onto the stack."),
            |state: &mut DemoState| state.stack.push(0),
        ),
    );
    set.define(
        OP_INC,
        Operator::new(
            Rendering::fixed("INC"),
            Rendering::fixed("Increment the top number on the stack."),
            |state: &mut DemoState| {
                if let Some(top) = state.stack.last_mut() {
                    *top += 1;
                }
            },
        ),
    );
    set.define(
        OP_DEC,
        Operator::new(
            Rendering::fixed("DEC"),
            Rendering::fixed("Decrement the top number on the stack."),
            |state: &mut DemoState| {
                if let Some(top) = state.stack.last_mut() {
                    *top -= 1;
                }
            },
        ),
    );
    set.define(
        OP_ADD,
        Operator::new(
            Rendering::fixed("ADD"),
            Rendering::fixed("Pop two numbers and push their sum."),
            |state: &mut DemoState| {
                if state.stack.len() >= 2 {
                    let b = state.stack.pop().unwrap();
                    let a = state.stack.pop().unwrap();
                    state.stack.push(a + b);
                }
            },
        ),
    );
    set.define(
        OP_CODESEP,
        Operator::new(
            Rendering::fixed("CODESEP"),
            Rendering::fixed("Do nothing."),
            |_state: &mut DemoState| {},
        ),
    );

    Machine::new(set)
}

const SCENARIO: [u8; 7] = [
    OP_ZERO, OP_INC, OP_INC, OP_CODESEP, OP_ZERO, OP_DEC, OP_ADD,
];

#[test]
fn test_demo_scenario_evaluates() {
    let machine = demo_machine();
    let result = machine.evaluate(&DemoState::new(SCENARIO.to_vec()));
    assert_eq!(result.ip, 7);
    assert_eq!(result.stack, vec![1]);
}

#[test]
fn test_demo_scenario_trace() {
    let machine = demo_machine();
    let steps = machine.debug(&DemoState::new(SCENARIO.to_vec()));

    assert_eq!(steps.len(), 8);
    assert_eq!(steps[0].description, "Begin script evaluation.");

    let stacks: Vec<&[i64]> = steps.iter().map(|step| &step.state.stack[..]).collect();
    let expected: Vec<Vec<i64>> = vec![
        vec![],
        vec![0],
        vec![1],
        vec![2],
        vec![2],
        vec![2, 0],
        vec![2, -1],
        vec![1],
    ];
    assert_eq!(stacks.len(), expected.len());
    for (got, want) in stacks.iter().zip(&expected) {
        assert_eq!(*got, &want[..]);
    }

    let asm: Vec<&str> = steps.iter().map(|step| step.asm.as_str()).collect();
    assert_eq!(
        asm,
        vec!["", "ZERO", "INC", "INC", "CODESEP", "ZERO", "DEC", "ADD"]
    );
}

#[test]
fn test_step_is_step_mutate_of_clone() {
    let machine = demo_machine();
    let state = DemoState::new(SCENARIO.to_vec());

    let stepped = machine.step(&state);
    let mut cloned = state.clone();
    machine.step_mutate(&mut cloned);
    assert_eq!(stepped, cloned);

    // The caller's state is never observably modified.
    assert_eq!(state, DemoState::new(SCENARIO.to_vec()));
}

#[test]
fn test_evaluate_matches_last_debug_entry() {
    let machine = demo_machine();
    let state = DemoState::new(SCENARIO.to_vec());
    let evaluated = machine.evaluate(&state);
    let steps = machine.debug(&state);
    assert_eq!(evaluated, steps.last().unwrap().state);
}

#[test]
fn test_step_past_end_is_noop() {
    let machine = demo_machine();
    let finished = machine.evaluate(&DemoState::new(SCENARIO.to_vec()));
    let after = machine.step(&finished);
    assert_eq!(after, finished);
}

#[test]
fn test_undefined_operator_dispatched() {
    let machine = demo_machine();
    let steps = machine.debug(&DemoState::new(vec![0xfe]));
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].asm, "UNDEFINED");
    assert_eq!(steps[1].state.stack, Vec::<i64>::new());
}
