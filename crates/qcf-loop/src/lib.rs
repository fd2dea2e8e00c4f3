//! `qcf-loop` — quantum-classical coupling feedback loop.
//!
//! The [`FeedbackController`] co-evolves a scalar coupling parameter with the
//! ground-state energy of the coupled operator it parameterizes. Each
//! iteration is recorded in a [`Trajectory`].
//!
//! ```rust
//! use qcf_loop::{FeedbackController, LoopConfig};
//! use qcf_oracle::{SolverConfig, StatevectorOracle};
//!
//! let config = LoopConfig {
//!     iterations: 3,
//!     solver: SolverConfig::exact(),
//!     ..LoopConfig::default()
//! };
//! let mut controller = FeedbackController::new(StatevectorOracle::new(), config).unwrap();
//! let trajectory = controller.run().unwrap();
//! assert_eq!(trajectory.len(), 3);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod report;
pub mod trajectory;

pub use config::LoopConfig;
pub use controller::{
    CancellationToken, ControllerState, FeedbackController, FeedbackState, run_single_shot,
};
pub use error::{LoopError, LoopResult};
pub use report::{RunOutcome, RunReport, format_parameters, format_scalar};
pub use trajectory::{Trajectory, TrajectoryEntry};
