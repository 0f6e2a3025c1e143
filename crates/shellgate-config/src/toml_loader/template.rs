//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Shellgate Configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "0.0.0.0"          # overridden by $SHELLGATE_HOST
# port = 3001               # overridden by $PORT
# path = "/terminal"        # WebSocket endpoint
# health_path = "/health"   # plain HTTP liveness probe

[terminal]
# cols = 80                 # 1-1000
# rows = 30                 # 1-1000
# output_queue_frames = 4096  # 1-65536, output is dropped past this

[guard]
# Substrings that block an input chunk wherever they appear.
# extra_blocked = ["shutdown -h now"]
# Prefixes that flag an input chunk as destructive (logged, still sent).
# extra_confirm = ["kubectl delete"]

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
    .to_string()
}
