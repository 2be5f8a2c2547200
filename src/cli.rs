use crate::build_info;
use crate::error::Result;
use crate::grid::GRID_DIMENSION;
use crate::solver_parameters::*;
use clap::Parser;
use std::path::PathBuf;

/// Solve a 2D elliptic equation by parallel Jacobi and Red-Black
/// relaxation on the same random grid, then compare the results.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Grid size, assume square.
    #[arg(short, long, default_value_t = GRID_DIMENSION)]
    pub dimension: usize,

    /// The number of worker threads each solver uses.
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Convergence threshold for the per-cell average difference.
    #[arg(long, default_value_t = TOLERANCE)]
    pub tolerance: f64,

    /// Report non-convergence after this many iterations.
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Chunk size to use for parallel initialization and reporting.
    #[arg(short, long, default_value = "4096")]
    pub chunk_size: usize,

    /// Seed for the random grid, defaults to the current time.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Also run the sequential reference solver.
    #[arg(short, long)]
    pub reference: bool,

    /// Directory for output files, will be created.
    /// WARNING, if this Directory
    /// already exists, current contents will be removed.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write a heat map of each converged grid,
    /// WARNING: we do not check image size, so be reasonable.
    #[arg(short, long, requires("output_dir"))]
    pub write_images: bool,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn solver_parameters(&self) -> SolverParameters {
        SolverParameters {
            threads: self.threads,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            chunk_size: self.chunk_size,
        }
    }

    pub fn cli_setup(name: &str) -> Result<Self> {
        let args = Args::parse();

        if args.build_info {
            build_info::print_report(name);
            std::process::exit(0);
        }

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();

        if let Some(output_dir) = &args.output_dir {
            let _ = std::fs::remove_dir_all(output_dir);
            std::fs::create_dir_all(output_dir)?;
        }

        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads.max(1))
            .thread_name(|i| format!("rayon_thread_{}", i))
            .build_global()
        {
            tracing::warn!("using existing rayon pool: {e}");
        }

        Ok(args)
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
        })
    }

    /// Where the heat map of `method` goes, when images are enabled.
    pub fn image_path(&self, method: &str) -> Option<PathBuf> {
        if !self.write_images {
            return None;
        }
        let mut path = self.output_dir.as_ref()?.clone();
        path.push(format!("{method}.png"));
        Some(path)
    }
}

/// Serve profiling data for `puffin_viewer` until the server is dropped.
#[cfg(feature = "profile-with-puffin")]
pub fn start_profiler() -> Option<puffin_http::Server> {
    let server_addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&server_addr) {
        Ok(server) => {
            println!(
                "Run this to view profiling data:  puffin_viewer {server_addr}"
            );
            profiling::puffin::set_scopes_on(true);
            Some(server)
        }
        Err(e) => {
            tracing::warn!("cannot start profiling server: {e}");
            None
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn defaults_test() {
        let args = Args::parse_from(["relax"]);
        assert_eq!(args.dimension, GRID_DIMENSION);
        assert_eq!(args.solver_parameters(), SolverParameters::default());
        assert!(args.image_path("jacobi").is_none());
    }

    #[test]
    fn options_test() {
        let args = Args::parse_from([
            "relax", "-d", "64", "-t", "4", "--tolerance", "0.5", "-s", "9",
            "-o", "out", "-w",
        ]);
        let parameters = args.solver_parameters();
        assert_eq!(args.dimension, 64);
        assert_eq!(parameters.threads, 4);
        assert_eq!(parameters.tolerance, 0.5);
        assert_eq!(args.seed(), 9);
        assert_eq!(
            args.image_path("jacobi"),
            Some(PathBuf::from("out/jacobi.png"))
        );
    }

    #[test]
    fn images_require_output_dir_test() {
        assert!(Args::try_parse_from(["relax", "--write-images"]).is_err());
    }
}
