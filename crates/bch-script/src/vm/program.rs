//! Top-level program composition.
//!
//! An authentication program pairs an unlocking and a locking script with
//! the per-input transaction context. Evaluation runs the unlocking
//! script on a fresh stack, pipes the resulting stack into the locking
//! script, and, when the locking script matches the P2SH template, pops
//! the top of the unlocking result and runs it as a redeem script. The
//! three passes share only stack contents; `ip`, the code-separator
//! position, and the script reset each pass.

use crate::Script;

use super::machine::{Machine, Step};
use super::scriptnum::as_bool;
use super::state::{CommonProgramState, ExternalState};
use super::VmError;

const UNLOCKING_BANNER: &str = "Begin unlocking script evaluation.";
const LOCKING_BANNER: &str = "Begin locking script evaluation.";
const P2SH_BANNER: &str = "Begin P2SH script evaluation.";

const P2SH_NOT_PUSH_ONLY: &str = "P2SH error: unlockingScript must be push-only.";
const P2SH_EMPTY_STACK: &str = "P2SH error: unlockingScript must not leave an empty stack.";

/// The input to program evaluation: both scripts plus the read-only
/// transaction context of the input being validated.
#[derive(Debug, Clone)]
pub struct AuthenticationProgram {
    /// The spender-supplied script.
    pub unlocking_script: Script,
    /// The script of the output being spent.
    pub locking_script: Script,
    /// The per-input transaction context.
    pub state: ExternalState,
}

impl AuthenticationProgram {
    /// Create an authentication program.
    pub fn new(unlocking_script: Script, locking_script: Script, state: ExternalState) -> Self {
        AuthenticationProgram {
            unlocking_script,
            locking_script,
            state,
        }
    }
}

/// Why a program failed the acceptance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// A pass latched an execution error.
    #[error("script execution failed: {0}")]
    Script(#[from] VmError),

    /// The unlocking script of a P2SH spend contained a non-push opcode.
    #[error("unlocking script is not push only")]
    NotPushOnly,

    /// The stack was empty where a result was required.
    #[error("stack empty at end of script execution")]
    EmptyStack,

    /// The final stack entry was not truthy.
    #[error("false stack entry at end of script execution")]
    EvalFalse,
}

fn pass_state(script: &Script, stack: Vec<Vec<u8>>, external: &ExternalState) -> CommonProgramState {
    CommonProgramState::new(script.to_bytes().to_vec(), stack, external.clone())
}

fn synthetic_step(description: &str, state: CommonProgramState) -> Step<CommonProgramState> {
    Step {
        asm: String::new(),
        description: description.to_string(),
        state,
    }
}

/// Evaluate a program, recording every intermediate state.
///
/// Returns the concatenated traces of the unlocking pass, the locking
/// pass, and (for P2SH locking scripts) either the redeem-script pass or
/// a synthetic step describing why the P2SH gate rejected the spend. An
/// unlocking-pass error returns the partial trace immediately.
pub fn debug_program(
    machine: &Machine<CommonProgramState>,
    program: &AuthenticationProgram,
) -> Vec<Step<CommonProgramState>> {
    let unlock_state = pass_state(&program.unlocking_script, Vec::new(), &program.state);
    let mut steps = machine.debug_with(&unlock_state, UNLOCKING_BANNER);
    let unlock_final = steps
        .last()
        .expect("a trace always has its banner entry")
        .state
        .clone();
    if unlock_final.error.is_some() {
        return steps;
    }

    let lock_state = pass_state(
        &program.locking_script,
        unlock_final.stack.clone(),
        &program.state,
    );
    let lock_steps = machine.debug_with(&lock_state, LOCKING_BANNER);
    let lock_final = lock_steps
        .last()
        .expect("a trace always has its banner entry")
        .state
        .clone();
    steps.extend(lock_steps);

    if program.locking_script.is_p2sh() {
        if !program.unlocking_script.is_push_only() {
            steps.push(synthetic_step(P2SH_NOT_PUSH_ONLY, lock_final));
            return steps;
        }

        let mut redeem_stack = unlock_final.stack.clone();
        let Some(redeem_script) = redeem_stack.pop() else {
            steps.push(synthetic_step(P2SH_EMPTY_STACK, lock_final));
            return steps;
        };

        let p2sh_state =
            CommonProgramState::new(redeem_script, redeem_stack, program.state.clone());
        steps.extend(machine.debug_with(&p2sh_state, P2SH_BANNER));
    }

    steps
}

/// Decide whether a program authorizes spending, without recording a
/// trace.
///
/// The program is authorized when every required pass completes without
/// an execution error and the final pass leaves a truthy top stack
/// element. For P2SH spends the unlocking script must be push-only, must
/// leave a non-empty stack, and the locking pass itself must succeed
/// before the redeem script decides the result.
pub fn verify_program(
    machine: &Machine<CommonProgramState>,
    program: &AuthenticationProgram,
) -> Result<(), VerifyError> {
    let unlock_final = machine.evaluate(&pass_state(
        &program.unlocking_script,
        Vec::new(),
        &program.state,
    ));
    if let Some(error) = unlock_final.error {
        return Err(VerifyError::Script(error));
    }

    let lock_final = machine.evaluate(&pass_state(
        &program.locking_script,
        unlock_final.stack.clone(),
        &program.state,
    ));

    let final_state = if program.locking_script.is_p2sh() {
        if !program.unlocking_script.is_push_only() {
            return Err(VerifyError::NotPushOnly);
        }

        let mut redeem_stack = unlock_final.stack;
        let Some(redeem_script) = redeem_stack.pop() else {
            return Err(VerifyError::EmptyStack);
        };

        // The hash gate itself must pass before the redeem script runs.
        check_pass_result(&lock_final)?;

        machine.evaluate(&CommonProgramState::new(
            redeem_script,
            redeem_stack,
            program.state.clone(),
        ))
    } else {
        lock_final
    };

    check_pass_result(&final_state)
}

fn check_pass_result(state: &CommonProgramState) -> Result<(), VerifyError> {
    if let Some(error) = state.error {
        return Err(VerifyError::Script(error));
    }
    match state.stack.last() {
        Some(top) if as_bool(top) => Ok(()),
        Some(_) => Err(VerifyError::EvalFalse),
        None => Err(VerifyError::EmptyStack),
    }
}
