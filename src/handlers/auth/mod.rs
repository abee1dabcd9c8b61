pub mod login;
pub mod refresh;
pub mod whoami;

pub use login::login_post;
pub use refresh::refresh_post;
pub use whoami::whoami_get;
