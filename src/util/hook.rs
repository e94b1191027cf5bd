use tracing::error;

use crate::ui::tui::Tui;

/// Restore the terminal before the default hook prints, and get the
/// panic into the log file since stdout is about to be torn down.
pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("panic: {panic_info}");
        let _ = Tui::restore();
        hook(panic_info);
    }));
}
