use crate::domain::value_objects::enums::refund_policies::RefundPolicy;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub auth: AuthSecret,
    pub refund_policy: RefundPolicy,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// Seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

/// HS256 key and optional expected `aud` claim for bearer tokens.
#[derive(Debug, Clone)]
pub struct AuthSecret {
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
}
