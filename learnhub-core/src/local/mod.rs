//! Small persisted key-value state kept on the client: CSRF token, theme,
//! local wishlist and base64-wrapped items.

pub mod secure_item;
pub mod storage;
pub mod theme;
pub mod wishlist;

pub use secure_item::{get_secure_item, set_secure_item};
pub use storage::{
    CSRF_TOKEN_KEY, FileLocalStore, LocalStore, LocalStoreError,
    MemoryLocalStore, THEME_KEY, WISHLIST_KEY,
};
pub use theme::{Theme, ThemeManager};
pub use wishlist::LocalWishlist;
