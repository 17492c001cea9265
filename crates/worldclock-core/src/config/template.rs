/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `worldclock init` to create a starter configuration file.
pub fn generate_config() -> String {
    "# worldclock configuration\n\
# Location: ~/.config/worldclock/config.toml\n\
\n\
# Clocks are shown in the order listed here.\n\
# timezone must be an IANA name (run 'worldclock zones' to list them).\n\
# Times are always shown as 24-hour HH:MM:SS.\n\
\n\
[[clocks]]\n\
city = \"San Francisco\"\n\
timezone = \"America/Los_Angeles\"\n\
use_24_hour = true\n\
\n\
[[clocks]]\n\
city = \"Tokyo\"\n\
timezone = \"Asia/Tokyo\"\n\
use_24_hour = true\n\
\n\
[display]\n\
# \"vertical\" stacks clocks top to bottom, \"horizontal\" places them side by side.\n\
orientation = \"vertical\"\n\
# Draw times with large block digits.\n\
big_digits = true\n\
# Colors in #rrggbb form.\n\
background = \"#000000\"\n\
foreground = \"#ffffff\"\n\
city_color = \"#ffffff\"\n\
# Blank columns left of the clocks.\n\
margin_left = 6\n\
# Blank rows above the first clock.\n\
margin_top = 1\n\
# Blank rows (or columns when horizontal) between clocks.\n\
spacing = 1\n\
\n\
[sync]\n\
# Query a network time server once at startup and log the clock offset.\n\
# The system clock is never changed.\n\
enabled = true\n\
server = \"pool.ntp.org\"\n\
port = 123\n\
# Give up waiting for a reply after this many milliseconds (100-30000).\n\
timeout_ms = 5000\n\
# On exit, wait this long for an unfinished sync before abandoning it.\n\
shutdown_grace_ms = 500\n\
\n\
[logging]\n\
# Log file: ~/.config/worldclock/logs/worldclock.log\n\
enabled = true\n\
# One of \"debug\", \"info\", \"warn\", \"error\".\n\
level = \"info\"\n\
# Rotate the log file after this many megabytes (at most 1024).\n\
max_file_mb = 10\n"
        .to_string()
}
