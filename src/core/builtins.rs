//! Node.js built-in module names.
//!
//! Built-ins are provided by the runtime itself and must never appear in an
//! emitted dependency set; they are rejected before any version resolution is
//! attempted.

/// Standard-library module names, sorted for binary search.
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Whether a name refers to a runtime built-in.
///
/// The `node:` scheme prefix and subpaths like `fs/promises` both resolve to
/// their root module.
pub fn is_builtin(name: &str) -> bool {
    let name = name.strip_prefix("node:").unwrap_or(name);
    let root = name.split('/').next().unwrap_or(name);
    NODE_BUILTINS.binary_search(&root).is_ok()
}
