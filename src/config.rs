//! Carga y gestión de configuración de la aplicación.

use std::env;
use anyhow::{anyhow, Result};

/// Variante de la tabla de reglas del recomendador.
///
/// `Minimal` reproduce la tabla histórica sin la regla de reducción de
/// costes (TCO); `Extended` la incluye. Ante un objetivo que sólo señala
/// reducción de costes, `Minimal` cae en el método de evaluación integral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleSet {
    Minimal,
    Extended,
}

impl RuleSet {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "extended" => Ok(Self::Extended),
            other => Err(anyhow!("Tabla de reglas no soportada: {other}")),
        }
    }
}

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,
    pub rule_set: RuleSet,
    pub include_diagrams: bool,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:7860".to_string());

        let rule_set_str = env::var("RULE_SET").unwrap_or_else(|_| "extended".to_string());
        let rule_set = RuleSet::from_str(&rule_set_str)?;

        let include_diagrams = match env::var("INCLUDE_DIAGRAMS") {
            Ok(v) => match v.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => return Err(anyhow!("Valor no válido para INCLUDE_DIAGRAMS: {other}")),
            },
            Err(_) => true,
        };

        Ok(Self {
            server_addr,
            rule_set,
            include_diagrams,
        })
    }
}
