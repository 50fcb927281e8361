mod authorize;
mod code_login;
mod guard;
pub mod interceptor;
mod storage;

pub use authorize::{login_navigation, login_url, sign_out, LOGIN_PATH};
pub use code_login::{code_login, CodeLoginOutcome, CODE_LOGIN_ENDPOINT};
pub use guard::{GuardDecision, RouteGuard};
pub use interceptor::SessionEffect;
pub use storage::{KeyringStore, MemoryStore, TokenStore};
