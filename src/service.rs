use anyhow::Result;
use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer,
};

use crate::config::Config;
use crate::dispatcher::{Dispatcher, ToolDescriptor};

/// MCP server exposing the weather tools
#[derive(Clone)]
pub struct Weather {
    dispatcher: Dispatcher,
}

impl Weather {
    /// Creates a new Weather service instance
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }

    /// Tool list in MCP form
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher.list_tools().iter().map(to_mcp_tool).collect()
    }
}

fn to_mcp_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool::new(
        descriptor.name,
        descriptor.description,
        descriptor.input_schema.clone(),
    )
}

impl ServerHandler for Weather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weather-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "A weather information service powered by the OpenWeatherMap API. \
                Provides current conditions, a 24-hour forecast and air quality for any \
                city name or 'lat,lon' pair. The free tier allows 1,000 calls/day."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Calling tool: {}", request.name);

        let output = self
            .dispatcher
            .call_tool(&request.name, request.arguments.as_ref())
            .await;

        let content = vec![Content::text(output.text)];
        if output.is_error {
            Ok(CallToolResult::error(content))
        } else {
            Ok(CallToolResult::success(content))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_carry_schema_and_description() {
        let weather = Weather::new(Config::new("key")).unwrap();
        let tools = weather.tools();

        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0].name, "get_current_weather");
        assert!(tools[0].description.is_some());
        assert!(tools[2].input_schema.contains_key("properties"));
    }

    #[test]
    fn test_server_info_enables_tools() {
        let weather = Weather::new(Config::new("key")).unwrap();
        let info = weather.get_info();

        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, "weather-mcp-server");
    }
}
