/// Constants used throughout the pathgate codebase
use std::time::Duration;

// Pathfinder console protocol
pub const MENU_SHORTEST_PATH: &str = "8";
pub const MENU_EXIT: &str = "0";

// Transcript markers
pub const PATH_START_MARKER: &str = "PATH_START";
pub const PATH_END_MARKER: &str = "PATH_END";
pub const NO_PATH_MARKER: &str = "No path";
pub const NO_PATH_MESSAGE: &str = "No path found between the cities";

// Build defaults
pub const DEFAULT_SOURCE_PATH: &str = "inventory.cpp";
pub const DEFAULT_EXECUTABLE_PATH: &str = "inventory";
pub const DEFAULT_COMPILER: &str = "g++";
pub const SOURCE_PLACEHOLDER: &str = "{source}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

// Timeouts
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(120);

// Bytes kept per captured output stream; the rest is drained and discarded
pub const MAX_CAPTURED_OUTPUT: usize = 1024 * 1024;

// Environment variable names
pub const PATHGATE_CONFIG_VAR: &str = "PATHGATE_CONFIG";
pub const PATHGATE_SOURCE_VAR: &str = "PATHGATE_SOURCE";
pub const PATHGATE_EXECUTABLE_VAR: &str = "PATHGATE_EXECUTABLE";
pub const PATHGATE_COMPILE_COMMAND_VAR: &str = "PATHGATE_COMPILE_COMMAND";
pub const PATHGATE_WORKDIR_VAR: &str = "PATHGATE_WORKDIR";
pub const PATHGATE_RUN_TIMEOUT_VAR: &str = "PATHGATE_RUN_TIMEOUT_MS";
pub const PATHGATE_BUILD_TIMEOUT_VAR: &str = "PATHGATE_BUILD_TIMEOUT_MS";
pub const PATHGATE_STRICT_TOTAL_VAR: &str = "PATHGATE_STRICT_TOTAL_COST";
pub const PATHGATE_LOG_VAR: &str = "PATHGATE_LOG";

/// Cities known to the bundled road network, in display order.
pub const CITIES: &[&str] = &[
    "Ahmedabad",
    "Gandhinagar",
    "Surat",
    "Vadodara",
    "Rajkot",
    "Jamnagar",
    "Bhuj",
    "Valsad",
    "Vapi",
    "Navsari",
    "Mehsana",
    "Palanpur",
    "Deesa",
    "Surendranagar",
    "Botad",
    "Bhavnagar",
    "Anand",
    "Nadiad",
    "Dahod",
    "Godhra",
    "Amreli",
    "Junagadh",
    "Porbandar",
    "Dwarka",
    "Morbi",
    "Modasa",
    "Himmatnagar",
    "Kalol",
    "Jetpur",
    "Mangrol",
    "Veraval",
    "Bharuch",
    "Ankleshwar",
];
