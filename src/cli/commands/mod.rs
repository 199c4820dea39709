mod dialog;
mod modules;
mod system;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in modules::definitions()
        .into_iter()
        .chain(dialog::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
