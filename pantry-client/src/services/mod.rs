pub mod auth;
pub mod inventory;
pub mod recipes;
pub mod users;

pub use auth::AuthService;
pub use inventory::InventoryService;
pub use recipes::RecipeService;
pub use users::UserService;
