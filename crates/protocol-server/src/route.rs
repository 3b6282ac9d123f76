//! Method and identity to operation.

use http::Method;

use crate::adapter::Operation;
use crate::error::DispatchError;

/// Pick the operation for a request. Stateless.
///
/// | method | identity | operation |
/// |--------|----------|-----------|
/// | GET    | absent   | query     |
/// | GET    | present  | probe     |
/// | POST   | any      | register  |
/// | PUT    | any      | submit    |
/// | DELETE | any      | purge     |
///
/// Anything else is [`DispatchError::MethodNotAllowed`].
pub fn route(method: &Method, identity_present: bool) -> Result<Operation, DispatchError> {
    match *method {
        Method::GET if identity_present => Ok(Operation::Probe),
        Method::GET => Ok(Operation::Query),
        Method::POST => Ok(Operation::Register),
        Method::PUT => Ok(Operation::Submit),
        Method::DELETE => Ok(Operation::Purge),
        _ => Err(DispatchError::MethodNotAllowed(method.clone())),
    }
}
