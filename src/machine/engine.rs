//! The machine: state set, active state, and the tick/update loop.

use crate::action::ActionError;
use crate::machine::builder::MachineBuilder;
use crate::machine::context::MachineContext;
use crate::machine::error::MachineError;
use crate::machine::history::{History, TransitionRecord};
use crate::machine::state::{StateId, StateNode};
use crate::variable::SharedScope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle phase of a machine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Built but not started; `tick()` is invalid.
    Unstarted,
    /// Started and accepting ticks.
    Running,
    /// Stopped; no further `start()` or `tick()` is valid.
    Stopped,
}

/// Notification raised after every completed state change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateChange {
    /// Machine name.
    pub machine: String,
    /// Machine instance id.
    pub machine_id: Uuid,
    /// State the machine left.
    pub from: String,
    /// State the machine entered.
    pub to: String,
    /// When the change completed.
    pub at: DateTime<Utc>,
    /// Tick number during which it fired.
    pub tick: u64,
}

type ChangeListener = Box<dyn FnMut(&StateChange) + Send>;

/// How one evaluation pass of the active state ended.
enum Pass {
    NoFire,
    Moved(StateId),
    ErrorRoute {
        transition_index: usize,
        error_id: StateId,
        error_actions: Vec<Box<dyn crate::action::Action>>,
    },
    Failed {
        action: String,
        err: ActionError,
    },
}

/// One running workflow instance.
///
/// The machine owns its state set, the active state, the instance-local
/// variable scope and a handle to the shared scope. It is pumped by the
/// host: `start()` once, then `tick().await` once per scheduling
/// interval, then `stop()`. The engine never spawns threads or tasks of
/// its own.
///
/// # Example
///
/// ```rust
/// use tickwork::machine::{MachineBuilder, TransitionBuilder};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut machine = MachineBuilder::new("session")
///     .states(["Init", "Offline"])
///     .initial("Init")
///     .transition("Init", TransitionBuilder::new().to("Offline"))
///     .build()
///     .unwrap();
///
/// machine.start().unwrap();
/// let changes = machine.tick().await.unwrap();
/// assert_eq!(changes[0].to, "Offline");
/// assert_eq!(machine.active_state(), "Offline");
/// machine.stop().unwrap();
/// # }
/// ```
pub struct Machine {
    name: Arc<str>,
    id: Uuid,
    states: Vec<StateNode>,
    initial: StateId,
    active: StateId,
    run_state: RunState,
    allow_chained: bool,
    in_flight: bool,
    tick_count: u64,
    ctx: MachineContext,
    history: History,
    listeners: Vec<ChangeListener>,
}

impl Machine {
    /// Cap on transitions chained within one `tick()` call when chained
    /// transitions are enabled. Breaching it is a [`MachineError::ChainLimit`].
    pub const MAX_CHAINED_TRANSITIONS: usize = 64;

    /// Start building a machine.
    pub fn builder(name: impl Into<String>) -> MachineBuilder {
        MachineBuilder::new(name)
    }

    pub(crate) fn from_parts(
        name: String,
        states: Vec<StateNode>,
        initial: StateId,
        allow_chained: bool,
        shared: SharedScope,
    ) -> Self {
        let name: Arc<str> = Arc::from(name.as_str());
        let id = Uuid::new_v4();
        Self {
            ctx: MachineContext::new(Arc::clone(&name), id, shared),
            name,
            id,
            states,
            initial,
            active: initial,
            run_state: RunState::Unstarted,
            allow_chained,
            in_flight: false,
            tick_count: 0,
            history: History::new(),
            listeners: Vec::new(),
        }
    }

    /// Machine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance id, fresh per built machine.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle phase.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Name of the active state.
    pub fn active_state(&self) -> &str {
        self.states[self.active].name()
    }

    /// Name of the declared initial state.
    pub fn initial_state(&self) -> &str {
        self.states[self.initial].name()
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    /// Look up a declared state by name.
    pub fn state(&self, name: &str) -> Option<&StateNode> {
        self.states.iter().find(|s| s.name() == name)
    }

    /// The evaluation context (machine identity plus variable scopes).
    pub fn context(&self) -> &MachineContext {
        &self.ctx
    }

    /// Mutable evaluation context, e.g. to define variables at setup.
    pub fn context_mut(&mut self) -> &mut MachineContext {
        &mut self.ctx
    }

    /// Every transition fired so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Register a host callback raised after every completed state change.
    pub fn on_state_changed(&mut self, listener: impl FnMut(&StateChange) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Enter the initial state and bind every condition.
    ///
    /// Valid only once, from [`RunState::Unstarted`]. `on_start` is called
    /// eagerly on every condition of every state so event subscriptions
    /// are live before the first `tick()`.
    pub fn start(&mut self) -> Result<(), MachineError> {
        match self.run_state {
            RunState::Running => {
                return Err(MachineError::AlreadyStarted {
                    machine: self.name.to_string(),
                })
            }
            RunState::Stopped => {
                return Err(MachineError::Stopped {
                    machine: self.name.to_string(),
                })
            }
            RunState::Unstarted => {}
        }

        self.active = self.initial;
        self.run_state = RunState::Running;

        let states = &mut self.states;
        let ctx = &mut self.ctx;
        for state in states.iter_mut() {
            for transition in state.transitions_mut() {
                for condition in transition.conditions.iter_mut() {
                    condition.on_start(ctx);
                }
            }
        }

        tracing::info!(
            machine = %self.name,
            state = %self.states[self.active].name(),
            "machine started"
        );
        Ok(())
    }

    /// Unbind every condition and refuse further ticks.
    ///
    /// Valid only from [`RunState::Running`]. Does not cancel a pending
    /// asynchronous action; a tick future dropped mid-action simply never
    /// completes its transition.
    pub fn stop(&mut self) -> Result<(), MachineError> {
        if self.run_state != RunState::Running {
            return Err(MachineError::NotRunning {
                machine: self.name.to_string(),
            });
        }

        let states = &mut self.states;
        let ctx = &mut self.ctx;
        for state in states.iter_mut() {
            for transition in state.transitions_mut() {
                for condition in transition.conditions.iter_mut() {
                    condition.on_stop(ctx);
                }
            }
        }

        self.run_state = RunState::Stopped;
        tracing::info!(machine = %self.name, "machine stopped");
        Ok(())
    }

    /// Evaluate the active state and fire at most one transition, or a
    /// bounded chain of them when chained transitions are enabled.
    ///
    /// Returns every state change completed during the call, oldest
    /// first; an empty vector means no transition's conditions held. When
    /// the chained-transition cap is breached, the changes that did
    /// complete travel in the [`MachineError::ChainLimit`] error instead.
    pub async fn tick(&mut self) -> Result<Vec<StateChange>, MachineError> {
        match self.run_state {
            RunState::Unstarted => {
                return Err(MachineError::NotStarted {
                    machine: self.name.to_string(),
                })
            }
            RunState::Stopped => {
                return Err(MachineError::Stopped {
                    machine: self.name.to_string(),
                })
            }
            RunState::Running => {}
        }
        if self.in_flight {
            return Err(MachineError::TransitionInFlight {
                machine: self.name.to_string(),
            });
        }

        self.tick_count += 1;
        self.ctx.set_tick(self.tick_count);

        let mut changes = Vec::new();
        loop {
            match self.evaluate_active().await? {
                Some(change) => {
                    changes.push(change);
                    if !self.allow_chained {
                        break;
                    }
                    if changes.len() >= Self::MAX_CHAINED_TRANSITIONS {
                        return Err(MachineError::ChainLimit {
                            machine: self.name.to_string(),
                            limit: Self::MAX_CHAINED_TRANSITIONS,
                            completed: changes,
                        });
                    }
                }
                None => break,
            }
        }
        Ok(changes)
    }

    /// One evaluation pass: find the first transition of the active state
    /// whose conditions all hold, run its actions, and move.
    async fn evaluate_active(&mut self) -> Result<Option<StateChange>, MachineError> {
        let active = self.active;

        let pass = {
            let states = &mut self.states;
            let ctx = &mut self.ctx;
            let state = &mut states[active];

            let mut chosen: Option<usize> = None;
            for (index, transition) in state.transitions_mut().iter_mut().enumerate() {
                let mut satisfied = true;
                for condition in transition.conditions.iter_mut() {
                    if !condition.is_satisfied(ctx) {
                        satisfied = false;
                        break;
                    }
                }
                if satisfied {
                    chosen = Some(index);
                    break;
                }
            }

            match chosen {
                None => Pass::NoFire,
                Some(index) => {
                    let transition = &mut state.transitions_mut()[index];
                    self.in_flight = true;

                    let mut failure: Option<(String, ActionError)> = None;
                    for step in transition.steps.iter_mut() {
                        if let Err(err) = step.run(ctx).await {
                            failure = Some((step.describe(), err));
                            break;
                        }
                    }

                    match failure {
                        None => Pass::Moved(transition.target),
                        Some((action, err)) => match transition.error_target {
                            Some(error_id) => {
                                tracing::warn!(
                                    machine = %self.name,
                                    action = %action,
                                    error = %err,
                                    "action failed; routing to error state"
                                );
                                Pass::ErrorRoute {
                                    transition_index: index,
                                    error_id,
                                    error_actions: std::mem::take(&mut transition.error_actions),
                                }
                            }
                            None => Pass::Failed { action, err },
                        },
                    }
                }
            }
        };

        match pass {
            Pass::NoFire => {
                self.in_flight = false;
                Ok(None)
            }
            Pass::Moved(target) => {
                let change = self.switch_to(active, target);
                self.in_flight = false;
                Ok(Some(change))
            }
            Pass::ErrorRoute {
                transition_index,
                error_id,
                mut error_actions,
            } => {
                // Move first, then run the error actions, per the firing
                // sequence contract. Exit/enter hooks fire for the error
                // state, not the originally intended target.
                let change = self.switch_to(active, error_id);

                let mut fatal: Option<(String, ActionError)> = None;
                for action in error_actions.iter_mut() {
                    if let Err(err) = action.execute(&mut self.ctx) {
                        fatal = Some((action.describe(), err));
                        break;
                    }
                }
                // Hand the actions back so the transition can fire again.
                self.states[active].transitions_mut()[transition_index].error_actions =
                    error_actions;
                self.in_flight = false;

                match fatal {
                    None => Ok(Some(change)),
                    Some((action, err)) => Err(MachineError::ErrorActionFailed {
                        state: self.states[error_id].name().to_string(),
                        action,
                        source: err,
                    }),
                }
            }
            Pass::Failed { action, err } => {
                self.in_flight = false;
                Err(MachineError::ActionFailed {
                    state: self.states[active].name().to_string(),
                    action,
                    source: err,
                })
            }
        }
    }

    /// Move the active state, firing hooks, history and notifications.
    fn switch_to(&mut self, from: StateId, to: StateId) -> StateChange {
        {
            let states = &mut self.states;
            let ctx = &mut self.ctx;
            for transition in states[from].transitions_mut() {
                for condition in transition.conditions.iter_mut() {
                    condition.on_exit_state(ctx);
                }
            }
            for transition in states[to].transitions_mut() {
                for condition in transition.conditions.iter_mut() {
                    condition.on_enter_state(ctx);
                }
            }
        }

        self.active = to;
        let change = StateChange {
            machine: self.name.to_string(),
            machine_id: self.id,
            from: self.states[from].name().to_string(),
            to: self.states[to].name().to_string(),
            at: Utc::now(),
            tick: self.tick_count,
        };
        self.history.record(TransitionRecord {
            from: change.from.clone(),
            to: change.to.clone(),
            at: change.at,
            tick: change.tick,
        });

        tracing::info!(
            machine = %change.machine,
            from = %change.from,
            to = %change.to,
            tick = change.tick,
            "state changed"
        );
        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
        change
    }
}
