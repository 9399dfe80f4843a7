use anyhow::{Context, Ok, Result};

use crate::{
    config::{config_model::AuthSecret, stage::Stage},
    domain::value_objects::enums::refund_policies::RefundPolicy,
};

use super::config_model::DotEnvyConfig;

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = super::config_model::Database {
        url: required("DATABASE_URL")?,
    };

    let auth = get_auth_secret()?;

    let refund_policy = match optional("REFUND_OVERDRAW_POLICY") {
        Some(policy) => policy
            .parse::<RefundPolicy>()
            .context("REFUND_OVERDRAW_POLICY is invalid")?,
        None => RefundPolicy::default(),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        refund_policy,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();

    Ok(AuthSecret {
        jwt_secret: required("JWT_SECRET")?,
        jwt_audience: optional("JWT_AUDIENCE"),
    })
}
