use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use explorer_core::termination::StopFlag;
use log::debug;
use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;

/// A [`StopFlag`] raised by SIGINT or SIGTERM, so that an interrupted exploration still reports
/// the tree it built.
pub(crate) fn stop_on_signal() -> std::io::Result<StopFlag> {
    let raised = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        let id = signal_hook::flag::register(signal, Arc::clone(&raised))?;
        debug!("registered handler {id:?} for signal {signal}");
    }

    Ok(StopFlag::from(raised))
}
