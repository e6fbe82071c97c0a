//! Ounce MCP Server
//!
//! Line-delimited JSON-RPC over stdio.
//!
//! Tools:
//! - convert: Convert a value between two units
//! - convert_many: Convert a list of values between two units
//! - convert_to_default: Convert a value to its unit system's default unit
//! - prettify: Rounded metric and US summary of a value
//! - factor: Conversion factor between two units
//! - default_units: Default unit per class for a unit system
//! - list_units: List unit names, optionally by class
//! - units_class: Class of a unit
//!
//! Environment:
//! - OUNCE_UNIT_SYSTEM: target system for convert_to_default (default: metric)
//! - RUST_LOG: log filter (default: info); logs go to stderr

use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use ounce::{DefaultUnits, UnitClass, UnitError, UnitSystem};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "ounce";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq)]
struct Config {
    /// Target system for convert_to_default when the call names none
    unit_system: UnitSystem,
}

impl Config {
    fn from_env() -> Result<Self, UnitError> {
        Self::from_value(env::var("OUNCE_UNIT_SYSTEM").ok().as_deref())
    }

    fn from_value(unit_system: Option<&str>) -> Result<Self, UnitError> {
        let unit_system = match unit_system {
            None | Some("") => UnitSystem::default(),
            Some(name) => name.parse()?,
        };
        Ok(Config { unit_system })
    }
}

/// Incoming JSON-RPC message; a missing `id` marks a notification
#[derive(Debug, Deserialize)]
struct McpRequest {
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

/// Outgoing JSON-RPC message carrying exactly one of `result` or `error`
#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

impl McpResponse {
    fn reply(id: Option<JsonValue>, outcome: Result<JsonValue, McpError>) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(error) => (None, Some(error)),
        };
        McpResponse { jsonrpc: "2.0", id, result, error }
    }
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
}

impl McpError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        McpError { code, message: message.into() }
    }

    fn parse_error(cause: &serde_json::Error) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {}", cause))
    }

    fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

/// Failure inside a tool call: bad arguments are protocol errors, while
/// conversion errors are reported back as tool results
#[derive(Debug)]
enum ToolError {
    Params(McpError),
    Unit(UnitError),
}

impl From<McpError> for ToolError {
    fn from(e: McpError) -> Self {
        ToolError::Params(e)
    }
}

impl From<UnitError> for ToolError {
    fn from(e: UnitError) -> Self {
        ToolError::Unit(e)
    }
}

type ToolResult = Result<JsonValue, ToolError>;

fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid OUNCE_UNIT_SYSTEM: {}", e);
            std::process::exit(2);
        }
    };

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Ounce MCP Server started");
    info!(unit_system = %config.unit_system, units = ounce::UNITS.len(), "configuration loaded");
    debug!(
        stdin_is_terminal = io::stdin().is_terminal(),
        stdout_is_terminal = io::stdout().is_terminal(),
        "stdio"
    );

    let stdin = io::stdin();
    let reader = io::BufReader::new(stdin.lock());
    if let Err(e) = serve(&config, reader, io::stdout()) {
        error!("Error on stdio: {}", e);
    }

    info!("Server shutting down");
}

/// Answer requests line by line until EOF
fn serve(config: &Config, reader: impl BufRead, mut writer: impl Write) -> io::Result<()> {
    info!("Server ready, waiting for requests...");

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(bytes = line.len(), "received");

        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                let response = handle_request(config, &request);

                // Notifications (no id) should NOT receive a response
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    continue;
                }
                response
            }
            Err(e) => {
                warn!("Error parsing request: {}", e);
                McpResponse::reply(None, Err(McpError::parse_error(&e)))
            }
        };

        let response_json = serde_json::to_string(&response)?;
        writeln!(writer, "{}", response_json)?;
        writer.flush()?;
    }

    info!("Client disconnected (EOF)");
    Ok(())
}

fn handle_request(config: &Config, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(config, &request.params),

        other => Err(McpError::method_not_found(other)),
    };

    McpResponse::reply(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "Client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion for lengths, weights, angles, times and rates"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Ounce converts numbers between units of the same class (length, weight, angle, time, time_rate). Use 'list_units' to see the supported unit names and 'prettify' for rounded metric and US summaries."
    }))
}

fn unit_property(description: &str) -> JsonValue {
    json!({ "type": ["string", "null"], "description": description })
}

fn class_property() -> JsonValue {
    json!({
        "type": "string",
        "description": "Required units class",
        "enum": UnitClass::ALL.iter().map(|c| c.name()).collect::<Vec<_>>()
    })
}

fn system_property() -> JsonValue {
    json!({
        "type": "string",
        "description": "Unit system (default: server setting)",
        "enum": UnitSystem::ALL.iter().map(|s| s.name()).collect::<Vec<_>>()
    })
}

fn overrides_property() -> JsonValue {
    json!({
        "type": "object",
        "description": "Per-class default unit overrides, e.g. {\"length\": \"mm\"}",
        "additionalProperties": { "type": "string" }
    })
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value from one unit to another of the same class.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": ["number", "null"], "description": "Value to convert" },
                        "from_unit": unit_property("Source unit (e.g., \"cm\")"),
                        "to_unit": unit_property("Target unit (e.g., \"in\")"),
                        "units_class": class_property()
                    },
                    "required": ["value", "from_unit", "to_unit"]
                }
            },
            {
                "name": "convert_many",
                "description": "Convert a list of values from one unit to another.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "values": { "type": "array", "items": { "type": "number" } },
                        "from_unit": unit_property("Source unit"),
                        "to_unit": unit_property("Target unit")
                    },
                    "required": ["values", "from_unit", "to_unit"]
                }
            },
            {
                "name": "convert_to_default",
                "description": "Convert a value to the default unit of its class in a unit system.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": ["number", "null"] },
                        "from_unit": unit_property("Source unit"),
                        "unit_system": system_property(),
                        "overrides": overrides_property()
                    },
                    "required": ["value", "from_unit"]
                }
            },
            {
                "name": "prettify",
                "description": "Rounded metric and US values for a measurement.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "number" },
                        "unit": unit_property("Unit of the value"),
                        "precision": {
                            "type": "integer",
                            "minimum": 0,
                            "description": "Decimal places; overrides per-unit rounding"
                        }
                    },
                    "required": ["value", "unit"]
                }
            },
            {
                "name": "factor",
                "description": "Multiplicative factor from one unit to another.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "from_unit": unit_property("Source unit"),
                        "to_unit": unit_property("Target unit"),
                        "units_class": class_property()
                    },
                    "required": ["from_unit", "to_unit"]
                }
            },
            {
                "name": "default_units",
                "description": "Default unit for each class in a unit system.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit_system": system_property(),
                        "overrides": overrides_property()
                    }
                }
            },
            {
                "name": "list_units",
                "description": "List all unit names, optionally restricted to one class.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "units_class": class_property()
                    }
                }
            },
            {
                "name": "units_class",
                "description": "Class of a unit, or null for a unitless value.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit": unit_property("Unit name")
                    },
                    "required": ["unit"]
                }
            }
        ]
    }))
}

fn handle_tool_call(config: &Config, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    let result = match name {
        "convert" => tool_convert(&args),
        "convert_many" => tool_convert_many(&args),
        "convert_to_default" => tool_convert_to_default(config, &args),
        "prettify" => tool_prettify(&args),
        "factor" => tool_factor(&args),
        "default_units" => tool_default_units(config, &args),
        "list_units" => tool_list_units(&args),
        "units_class" => tool_units_class(&args),
        _ => return Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    };

    match result {
        Ok(r) => Ok(r),
        Err(ToolError::Params(e)) => Err(e),
        Err(ToolError::Unit(e)) => {
            debug!(tool = name, code = e.code(), "tool reported error: {}", e);
            Ok(json!({
                "content": [{ "type": "text", "text": format!("Error: {}", e) }],
                "error": { "code": e.code(), "message": e.to_string() },
                "isError": true
            }))
        }
    }
}

fn tool_output(text: String, data: JsonValue) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": data,
        "isError": false
    })
}

/// Optional unit argument: absent and null are both "no unit"
fn unit_arg<'a>(args: &'a JsonValue, key: &str) -> Result<Option<&'a str>, McpError> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(McpError::invalid_params(format!("{} must be a string or null", key))),
    }
}

/// Optional numeric argument: absent and null are both "no value"
fn value_arg(args: &JsonValue, key: &str) -> Result<Option<f64>, McpError> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v.as_f64()
            .map(Some)
            .ok_or_else(|| McpError::invalid_params(format!("{} must be a number or null", key))),
    }
}

fn class_arg(args: &JsonValue) -> Result<Option<UnitClass>, ToolError> {
    match unit_arg(args, "units_class")? {
        None => Ok(None),
        Some(name) => Ok(Some(name.parse()?)),
    }
}

fn system_arg<'a>(config: &Config, args: &'a JsonValue) -> Result<&'a str, McpError> {
    Ok(unit_arg(args, "unit_system")?.unwrap_or(config.unit_system.name()))
}

fn overrides_arg(args: &JsonValue) -> Result<DefaultUnits, ToolError> {
    let mut overrides = DefaultUnits::new();
    let Some(raw) = args.get("overrides").filter(|v| !v.is_null()) else {
        return Ok(overrides);
    };
    let obj = raw.as_object()
        .ok_or_else(|| McpError::invalid_params("overrides must be an object"))?;
    for (class, unit) in obj {
        let unit = unit.as_str()
            .ok_or_else(|| McpError::invalid_params(format!("override for {} must be a string", class)))?;
        overrides.insert(class.parse()?, unit.to_string());
    }
    Ok(overrides)
}

fn tool_convert(args: &JsonValue) -> ToolResult {
    let value = value_arg(args, "value")?;
    let from = unit_arg(args, "from_unit")?;
    let to = unit_arg(args, "to_unit")?;
    let class = class_arg(args)?;

    let result = ounce::convert(value, from, to, class)?;
    Ok(tool_output(result.to_string(), json!(result)))
}

fn tool_convert_many(args: &JsonValue) -> ToolResult {
    let values = args.get("values")
        .and_then(|v| v.as_array())
        .ok_or_else(|| McpError::invalid_params("Missing values"))?
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| McpError::invalid_params("values must be numbers")))
        .collect::<Result<Vec<f64>, McpError>>()?;
    let from = unit_arg(args, "from_unit")?;
    let to = unit_arg(args, "to_unit")?;

    let converted = ounce::convert_many(&values, from, to)?;
    Ok(tool_output(format!("Converted {} values", converted.len()), json!(converted)))
}

fn tool_convert_to_default(config: &Config, args: &JsonValue) -> ToolResult {
    let value = value_arg(args, "value")?;
    let from = unit_arg(args, "from_unit")?;
    let system = system_arg(config, args)?;
    let overrides = overrides_arg(args)?;

    let defaults = ounce::default_units(system, &overrides)?;
    let result = ounce::convert_to_default(value, from, &defaults)?;
    Ok(tool_output(result.to_string(), json!(result)))
}

fn tool_prettify(args: &JsonValue) -> ToolResult {
    let value = value_arg(args, "value")?
        .ok_or_else(|| McpError::invalid_params("Missing value"))?;
    let unit = unit_arg(args, "unit")?;
    let precision = match args.get("precision") {
        None | Some(JsonValue::Null) => None,
        Some(p) => Some(
            p.as_u64()
                .and_then(|p| u32::try_from(p).ok())
                .ok_or_else(|| McpError::invalid_params("precision must be a non-negative integer"))?,
        ),
    };

    let result = ounce::prettify(value, unit, precision)?;
    Ok(tool_output(result.to_string(), json!(result)))
}

fn tool_factor(args: &JsonValue) -> ToolResult {
    let from = unit_arg(args, "from_unit")?;
    let to = unit_arg(args, "to_unit")?;
    let class = class_arg(args)?;

    let factor = ounce::factor(from, to, class)?;
    Ok(tool_output(factor.to_string(), json!(factor)))
}

fn tool_default_units(config: &Config, args: &JsonValue) -> ToolResult {
    let system = system_arg(config, args)?;
    let overrides = overrides_arg(args)?;

    let defaults = ounce::default_units(system, &overrides)?;
    let text = defaults.iter()
        .map(|(class, unit)| format!("{}: {}", class, unit))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(tool_output(text, json!(defaults)))
}

fn tool_list_units(args: &JsonValue) -> ToolResult {
    let names = match class_arg(args)? {
        Some(class) => ounce::units_in_class(class),
        None => ounce::all_unit_names(),
    };
    Ok(tool_output(names.join(", "), json!(names)))
}

fn tool_units_class(args: &JsonValue) -> ToolResult {
    let unit = unit_arg(args, "unit")?;
    let class = ounce::class_of(unit)?;
    let text = class.map_or_else(|| "unitless".to_string(), |c| c.to_string());
    Ok(tool_output(text, json!(class)))
}
