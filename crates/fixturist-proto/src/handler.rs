//! The contract for the unit under test.

use crate::{Request, Response};

/// A request handler whose responses are captured into fixtures.
///
/// Implementors receive a fully prepared [`Request`] (method, action, params,
/// headers and session set by setups) and produce a [`Response`]. Any error
/// returned here reaches the scenario's caller unchanged.
///
/// # Example
///
/// ```
/// use fixturist_proto::{Handler, Request, Response};
/// use serde_json::json;
///
/// struct UsersController;
///
/// impl Handler for UsersController {
///     fn qualified_name(&self) -> String {
///         "app::api::v1::UsersController".to_string()
///     }
///
///     fn invoke(&self, request: &Request) -> anyhow::Result<Response> {
///         match request.action.as_str() {
///             "index" => Ok(Response::json(json!([]))),
///             other => anyhow::bail!("unknown action: {other}"),
///         }
///     }
/// }
///
/// assert_eq!(UsersController.qualified_name(), "app::api::v1::UsersController");
/// ```
pub trait Handler: Send + Sync {
    /// Fully qualified name of the handler, used to derive its fixture namespace.
    ///
    /// Defaults to [`std::any::type_name`] of the implementor. That output is
    /// not guaranteed to stay the same across compiler versions, so a
    /// toolchain upgrade could move every fixture this handler owns.
    /// Handlers whose fixtures are committed should override this with a
    /// fixed name.
    fn qualified_name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Invokes the action named in `request`.
    fn invoke(&self, request: &Request) -> anyhow::Result<Response>;
}
