pub mod livros;

use biblioteca_db::Database;
use biblioteca_kernel::ModuleRegistry;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) {
    registry.register(livros::create_module(db.clone()));
}
