use serde::Serialize;

use plinth_auth::{CredentialScope, Principal};

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub plugin: String,
    pub principal: Principal,
    pub scope: Vec<CredentialScope>,
}
