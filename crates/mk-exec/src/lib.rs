//! Bounded-concurrency execution of build-tool invocations.
//!
//! - [`Gate`]: counting admission control over simultaneous runs.
//! - [`resolve`]: pure resolution of params into a [`CommandLine`].
//! - [`ProcRunner`]: launches one process under a deadline and captures its output.
//! - [`Executor`]: acquire → resolve → run → release, always yielding a [`MakeResult`].
mod error;
pub use error::{ExecError, FailureKind};

mod config;
pub use config::ExecutorConfig;

mod event;
pub use event::{EventKind, ExecEvent, Subscribe};

mod gate;
pub use gate::{Gate, GatePermit};

mod resolve;
pub use resolve::{CommandLine, resolve};

mod proc;
pub use proc::{ProcOutcome, ProcRunner};

mod executor;
pub use executor::{Execution, Executor};

mod util;

pub use mk_model::{MakeParams, MakeResult};
pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    pub use crate::{
        CancellationToken, ExecError, Execution, Executor, ExecutorConfig, FailureKind,
        MakeParams, MakeResult, Subscribe,
    };
}
