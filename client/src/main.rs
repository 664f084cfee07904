use clap::Parser;
use client::input::spawn_keyboard_reader;
use client::logging::init_logging;
use client::network::{bind_socket, Client};
use client::rendering::{TerminalGuard, TerminalRenderer};
use client::signal::CancellationSignal;
use client::ClientError;
use log::{error, info};
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// IPv4 or IPv6 address of the server
    server_address: IpAddr,

    /// UDP port of the server
    port: u16,

    /// Write logs to the first free <PREFIX><N>.txt. Setting RUST_LOG alone
    /// logs to dotgrid-client<N>.txt
    #[arg(long, value_name = "PREFIX")]
    log_file: Option<String>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match init_logging(args.log_file.as_deref()) {
        Ok(Some(path)) => eprintln!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", ClientError::Runtime(e));
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(args));
    // The stdin reader is parked in a blocking read that cannot be interrupted.
    runtime.shutdown_background();

    match result {
        Ok(()) => {
            info!("Client shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let server_addr = SocketAddr::new(args.server_address, args.port);
    info!("Connecting to: {}", server_addr);

    let socket = bind_socket(server_addr).await?;

    let cancel = CancellationSignal::new();
    cancel.listen_for_interrupt();

    let _terminal = TerminalGuard::enter().map_err(ClientError::Terminal)?;
    let (columns, rows) = crossterm::terminal::size().map_err(ClientError::Terminal)?;
    let renderer = TerminalRenderer::new(std::io::stdout(), columns, rows);

    let (keys, _reader) = spawn_keyboard_reader(tokio::io::stdin());

    let mut client = Client::new(socket, server_addr, renderer, cancel);
    client.run(keys).await
}
