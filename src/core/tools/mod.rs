pub mod catalog;
pub mod contract;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::error::{EngineError, EngineResult};
pub use contract::{FieldKind, InputContract};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub contract: InputContract,
}

impl ToolDefinition {
    pub fn new(name: &'static str, description: &'static str, contract: InputContract) -> Self {
        Self {
            name,
            description,
            contract,
        }
    }

    pub fn input_schema(&self) -> Value {
        self.contract.to_schema()
    }
}

impl Serialize for ToolDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
        .serialize(serializer)
    }
}

/// One capability every tool implements: take a JSON input, return a JSON
/// result or a typed error.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Reject input the handler could never accept, before the call is
    /// tracked. Runs after the catalog contract has passed.
    fn check(&self, _input: &Value) -> EngineResult<()> {
        Ok(())
    }

    async fn call(&self, input: Value) -> EngineResult<Value>;
}

/// Deserialize a tool input into its request shape. A null body is read as `{}`.
pub fn parse_input<T: DeserializeOwned>(input: Value) -> EngineResult<T> {
    let input = if input.is_null() { json!({}) } else { input };
    serde_json::from_value(input)
        .map_err(|e| EngineError::Validation(format!("Invalid tool input: {}", e)))
}

/// `check` for handlers whose whole input is one typed request.
pub fn check_input<T: DeserializeOwned>(input: &Value) -> EngineResult<()> {
    parse_input::<T>(input.clone()).map(|_| ())
}

/// Catalog of tool definitions plus the handler bound to each name.
///
/// Definitions keep catalog order for discovery. Binding a handler to a name
/// that already has one replaces it.
#[derive(Default)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions(definitions: Vec<ToolDefinition>) -> Self {
        let mut registry = Self::new();
        for def in definitions {
            registry.define(def);
        }
        registry
    }

    pub fn define(&mut self, definition: ToolDefinition) {
        match self
            .definitions
            .iter_mut()
            .find(|d| d.name == definition.name)
        {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
    }

    pub fn register(&mut self, name: &str, handler: Arc<dyn ToolHandler>) {
        if self.handlers.insert(name.to_string(), handler).is_some() {
            warn!("Tool handler for '{}' replaced by a later registration", name);
        } else {
            info!("Registered tool handler: {}", name);
        }
    }

    pub fn lookup(&self, name: &str) -> EngineResult<&ToolDefinition> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| EngineError::ToolNotFound(name.to_string()))
    }

    pub fn list(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn handler(&self, name: &str) -> EngineResult<Arc<dyn ToolHandler>> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::ToolNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(&'static str);

    #[async_trait]
    impl ToolHandler for Constant {
        async fn call(&self, _input: Value) -> EngineResult<Value> {
            Ok(json!(self.0))
        }
    }

    #[test]
    fn lookup_unknown_tool_is_not_found() {
        let registry = ToolRegistry::with_definitions(catalog::builtin_definitions());
        assert_eq!(
            registry.lookup("missing").unwrap_err(),
            EngineError::ToolNotFound("missing".into())
        );
    }

    #[test]
    fn list_preserves_catalog_order() {
        let registry = ToolRegistry::with_definitions(catalog::builtin_definitions());
        assert_eq!(registry.list().len(), 9);
        assert_eq!(registry.list()[0].name, catalog::ORACLE_QUERY);
        assert_eq!(registry.list()[8].name, catalog::SEARCH_LINKEDIN);
    }

    #[test]
    fn redefining_a_tool_keeps_its_position() {
        let mut registry = ToolRegistry::with_definitions(catalog::builtin_definitions());
        registry.define(ToolDefinition::new(
            catalog::ORACLE_QUERY,
            "replaced",
            InputContract::new(),
        ));
        assert_eq!(registry.list().len(), 9);
        assert_eq!(registry.list()[0].description, "replaced");
    }

    #[tokio::test]
    async fn last_registered_handler_wins() {
        let mut registry = ToolRegistry::new();
        registry.register("note", Arc::new(Constant("first")));
        registry.register("note", Arc::new(Constant("second")));
        let handler = registry.handler("note").unwrap();
        assert_eq!(handler.call(Value::Null).await.unwrap(), json!("second"));
    }

    #[test]
    fn definition_serializes_with_input_schema_key() {
        let def = ToolDefinition::new(
            "demo",
            "Demo tool",
            InputContract::new().required("q", FieldKind::String),
        );
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["name"], "demo");
        assert_eq!(value["inputSchema"]["required"], json!(["q"]));
    }

    #[test]
    fn parse_input_reads_null_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct Req {
            #[serde(default)]
            limit: Option<u32>,
        }
        let req: Req = parse_input(Value::Null).unwrap();
        assert_eq!(req.limit, None);
    }
}
