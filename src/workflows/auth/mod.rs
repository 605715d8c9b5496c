//! Session workflows: login, signup, reissue, session check, logout,
//! withdraw, and member reads.
//!
//! Every workflow returns a description ([`AsyncIO`](crate::effect::AsyncIO))
//! or a plain `Result`; none of them panics or lets a failure escape
//! except through its return value.
//!
//! | workflow | failure policy |
//! |---|---|
//! | [`check_login`] | every failure resolves to `false` |
//! | [`login`] / [`sign_up`] | token persistence failure is `DataConversion`; FCM push failure is swallowed |
//! | [`reissue`] | persistence failure is `DataConversion` |
//! | [`logout`] | only access / refresh deletions are checked |
//! | [`withdraw`] | any local deletion failure fails the workflow |

mod login;
mod logout;
mod member;
mod session;

pub use login::{LoginResult, login, sign_up};
pub use logout::{logout, withdraw};
pub use member::{fetch_jobs, fetch_profile, update_fcm_token};
pub use session::{check_login, reissue, save_session};
