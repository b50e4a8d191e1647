pub mod auth;
pub mod inventory;
pub mod recipe;
pub mod user;

pub use auth::{LoginRequest, RegisterRequest, TokenPair};
pub use inventory::{
    BulkAddRequest, BulkAddResponse, DetectedItem, InventoryItem, NewInventoryItem,
    ScanReceiptResponse, UpdateInventoryItem,
};
pub use recipe::{FavoriteStatus, Recipe, RecipePage, RecipeQuery};
pub use user::{CurrentUser, Profile, UpdateProfileRequest, User};
