//! Review notification bot: wires the poller, dispatcher and maintainer
//! reporter together under a restarting supervisor.

pub mod app;
pub mod supervisor;
