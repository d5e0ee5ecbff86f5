use std::{env, net::SocketAddr, process::ExitCode};

use pathfan::{
    dispatch::Dispatcher, graph::Graph, matrix::Matrix, net::DEFAULT_WORKER_PORT,
    worker::Worker,
};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("worker") => run_worker(args.get(1).map(String::as_str)).await,
        Some("paths") => run_paths(endpoints_from(&args[1..])).await,
        Some("matmul") => run_matmul(endpoints_from(&args[1..])).await,
        _ => {
            eprintln!("usage: pathfan <worker [port] | paths [endpoint..] | matmul [endpoint..]>");
            ExitCode::FAILURE
        }
    }
}

async fn run_worker(port: Option<&str>) -> ExitCode {
    let port = match port {
        Some(raw) => match raw.parse() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("invalid port: {raw}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_WORKER_PORT,
    };
    let worker = match Worker::bind(SocketAddr::from(([127, 0, 0, 1], port))) {
        Ok(worker) => worker,
        Err(e) => {
            error!("could not bind worker on port {port}: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = worker.serve().await {
        error!("worker stopped: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Worker endpoints from the command line, or the stock two-worker local
/// pool when none are given.
fn endpoints_from(args: &[String]) -> Vec<SocketAddr> {
    if args.is_empty() {
        return vec![
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_WORKER_PORT)),
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_WORKER_PORT + 1)),
        ];
    }
    args.iter()
        .filter_map(|raw| match raw.parse() {
            Ok(addr) => Some(addr),
            Err(_) => {
                eprintln!("skipping invalid endpoint: {raw}");
                None
            }
        })
        .collect()
}

async fn run_paths(endpoints: Vec<SocketAddr>) -> ExitCode {
    let graph = example_graph();
    let (start, end) = ("N0", "N24");

    let dispatcher = Dispatcher::new(endpoints);
    let (paths, elapsed) = dispatcher.find_paths(&graph, start, end).await;

    println!("found {} paths from {start} to {end}", paths.len());
    println!("execution time: {:.6} seconds", elapsed.as_secs_f64());
    println!("first few paths:");
    for path in paths.iter().take(5) {
        println!("  {}", path.join(" -> "));
    }
    ExitCode::SUCCESS
}

async fn run_matmul(endpoints: Vec<SocketAddr>) -> ExitCode {
    let a = Matrix::from_rows(&[&[2.0, 2.0], &[3.0, 1.0]]);
    let b = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);

    let dispatcher = Dispatcher::new(endpoints);
    let (result, elapsed) = dispatcher.multiply(&a, &b).await;
    let expected = a.multiply(&b);

    println!("result:");
    print_matrix(&result);
    println!("expected:");
    print_matrix(&expected);
    println!("execution time: {:.6} seconds", elapsed.as_secs_f64());
    let verdict = if result == expected { "correct" } else { "incorrect" };
    println!("result is {verdict}");
    ExitCode::SUCCESS
}

fn print_matrix(m: &Matrix) {
    for i in 0..m.rows() {
        let row: Vec<String> = (0..m.cols()).map(|j| m.get(i, j).to_string()).collect();
        println!("  [{}]", row.join(", "));
    }
}

/// The stock 25-node demo graph the cluster is exercised against.
fn example_graph() -> Graph {
    let mut g = Graph::new();
    g.insert("N0", &["N3", "N24", "N1", "N7"]);
    g.insert("N1", &["N6", "N5", "N0", "N9", "N13"]);
    g.insert("N2", &["N14", "N15", "N12", "N19", "N21", "N3", "N17"]);
    g.insert("N3", &["N15", "N0", "N13", "N21", "N2"]);
    g.insert("N4", &["N17", "N11", "N8", "N20"]);
    g.insert("N5", &["N19", "N1"]);
    g.insert("N6", &["N22", "N24", "N1", "N11"]);
    g.insert("N7", &["N8", "N15", "N0", "N19", "N9", "N21", "N18"]);
    g.insert("N8", &["N23", "N13", "N4", "N7"]);
    g.insert("N9", &["N1", "N7"]);
    g.insert("N10", &["N14", "N11", "N23"]);
    g.insert("N11", &["N10", "N6", "N16", "N4", "N12", "N13"]);
    g.insert("N12", &["N11", "N23", "N2"]);
    g.insert("N13", &["N11", "N20", "N8", "N15", "N3", "N1"]);
    g.insert("N14", &["N10", "N2"]);
    g.insert("N15", &["N7", "N19", "N13", "N3", "N23", "N2"]);
    g.insert("N16", &["N19", "N11", "N21", "N20"]);
    g.insert("N17", &["N24", "N4", "N2"]);
    g.insert("N18", &["N22", "N7"]);
    g.insert("N19", &["N5", "N16", "N15", "N7", "N2"]);
    g.insert("N20", &["N16", "N13", "N4"]);
    g.insert("N21", &["N16", "N7", "N3", "N23", "N2"]);
    g.insert("N22", &["N6", "N18"]);
    g.insert("N23", &["N10", "N8", "N15", "N12", "N21"]);
    g.insert("N24", &["N6", "N17", "N0"]);
    g
}
