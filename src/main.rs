use relax::cli::Args;
use relax::convergence::{ConvergenceDriver, ConvergenceReport};
use relax::grid::{Grid, UPPER_BOUND_ON_GRID_VALUE};
use relax::heat_map::write_heat_map;
use relax::init;
use relax::report::*;
use relax::solver::*;
use relax::solver_interface::RelaxationMethod;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let args = match Args::cli_setup("relax") {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> relax::Result<()> {
    #[cfg(feature = "profile-with-puffin")]
    let _profiler = relax::cli::start_profiler();

    let driver = ConvergenceDriver::new(args.solver_parameters());
    let chunk_size = driver.parameters().chunk_size;
    let seed = args.seed();

    println!(
        "Creating a grid of dimension {} x {}, seed {seed}.",
        args.dimension, args.dimension
    );
    let mut seeded = Grid::new(args.dimension)?;
    init::rand(&mut seeded, UPPER_BOUND_ON_GRID_VALUE, seed, chunk_size);

    let reference = if args.reference {
        Some(timed_solve(&driver, &mut ReferenceSolver::new(), &seeded)?)
    } else {
        None
    };
    let red_black = timed_solve(&driver, &mut RedBlackSolver::new(), &seeded)?;
    let jacobi = timed_solve(&driver, &mut JacobiSolver::new(), &seeded)?;

    let mut solved: Vec<&(ConvergenceReport, Grid)> = Vec::new();
    solved.extend(reference.as_ref());
    solved.push(&red_black);
    solved.push(&jacobi);

    for (report, grid) in &solved {
        println!("\n{} statistics:", report.method);
        println!("{}", GridStatistics::compute(grid, chunk_size));
    }

    println!();
    if let Some((reference_report, reference_grid)) = &reference {
        for (report, grid) in [&red_black, &jacobi] {
            print_difference(
                reference_report.method,
                reference_grid,
                report.method,
                grid,
                chunk_size,
            )?;
        }
    }
    print_difference(
        red_black.0.method,
        &red_black.1,
        jacobi.0.method,
        &jacobi.1,
        chunk_size,
    )?;

    for (report, grid) in &solved {
        if let Some(path) = args.image_path(report.method) {
            write_heat_map(grid, UPPER_BOUND_ON_GRID_VALUE, &path)?;
            tracing::info!(path = %path.display(), "wrote heat map");
        }
    }

    Ok(())
}

/// Solve a copy of `seeded`, timing only the solve itself.
fn timed_solve<M: RelaxationMethod>(
    driver: &ConvergenceDriver,
    method: &mut M,
    seeded: &Grid,
) -> relax::Result<(ConvergenceReport, Grid)> {
    println!(
        "\nUsing {} threads to solve the grid using the {} method.",
        driver.parameters().threads,
        method.name()
    );
    let mut grid = seeded.clone();

    let now = Instant::now();
    let report = driver.solve(method, &mut grid)?;
    let elapsed = now.elapsed();
    profiling::finish_frame!();

    println!("Convergence achieved after {} iterations.", report.iterations);
    println!(
        "CPU run time {} = {:.8} s.",
        report.method,
        elapsed.as_secs_f64()
    );
    Ok((report, grid))
}

fn print_difference(
    left_name: &str,
    left: &Grid,
    right_name: &str,
    right: &Grid,
    chunk_size: usize,
) -> relax::Result<()> {
    let difference = average_difference(left, right, chunk_size)?;
    println!(
        "Average difference between {} and {}: {:.6}",
        left_name, right_name, difference
    );
    Ok(())
}
