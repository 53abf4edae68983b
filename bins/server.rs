use std::process::ExitCode;

use common::utils::logging::{format_from_env, init_logging};
use configs::AppConfig;
use tokio::runtime::{Builder, Runtime};
use tracing::{error, info};
use uuid::Uuid;

const SERVICE: &str = "user_api";

/// Worker threads: `[server].worker_threads`, else `TOKIO_WORKER_THREADS`.
fn worker_threads() -> Option<usize> {
    match AppConfig::load_or_env() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(_) => std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse().ok()),
    }
}

fn build_runtime(threads: Option<usize>) -> std::io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = threads {
        builder.worker_threads(n);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env 先加载，RUST_LOG / LOG_FORMAT 才能生效
    dotenvy::dotenv().ok();
    let format = format_from_env();
    init_logging(format);

    let instance = Uuid::new_v4();
    let pid = std::process::id();

    // Panic 钩子：异常也走结构化日志
    std::panic::set_hook(Box::new(move |info| {
        error!(service = SERVICE, event = "panic", %instance, pid, message = %info, "unhandled panic");
    }));

    let threads = worker_threads();
    let rt = match build_runtime(threads) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, event = "runtime_build_failed", error = %e, "cannot build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = SERVICE,
        event = "start",
        %instance,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        ?format,
        threads = ?threads,
        "user api starting"
    );

    match rt.block_on(server::run()) {
        Ok(()) => {
            info!(service = SERVICE, event = "stop", %instance, pid, "user api stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = SERVICE, event = "run_failed", %instance, error = %e, "user api exited with error");
            ExitCode::FAILURE
        }
    }
}
