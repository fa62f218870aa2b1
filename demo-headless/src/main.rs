use clap::Parser;
use synow_grid_core::{Angstrom, GridConfig, RadiationModel, Setup, SynowGrid};
use tracing_subscriber::EnvFilter;

/// Build a SYNOW grid and run a single reset against it
#[derive(Parser, Debug)]
#[command(name = "synow-grid-demo")]
#[command(about = "Spectral grid construction demo", long_about = None)]
struct Args {
    /// Blue edge of the observed window (Å)
    #[arg(long, default_value_t = 3000.0)]
    min_output_wl: f64,

    /// Red edge of the observed window (Å)
    #[arg(long, default_value_t = 10000.0)]
    max_output_wl: f64,

    /// Wavelength bin width in velocity units
    #[arg(short, long, default_value_t = 0.3)]
    bin_width: f64,

    /// Number of velocity shells
    #[arg(long, default_value_t = 100)]
    v_size: usize,

    /// Largest outer velocity any trial may use
    #[arg(long, default_value_t = 30.0)]
    v_outer_max: f64,

    /// Photospheric velocity for the trial
    #[arg(long, default_value_t = 10.0)]
    v_phot: f64,

    /// Outer velocity for the trial
    #[arg(long, default_value_t = 30.0)]
    v_outer: f64,

    /// Photospheric temperature (K)
    #[arg(short, long, default_value_t = 10000.0)]
    t_phot: f64,

    /// Print the first N wavelength bins with their photospheric intensity
    #[arg(short, long, default_value_t = 5)]
    show_bins: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== SYNOW Grid Demo ===\n");

    let config = GridConfig {
        min_output_wl: args.min_output_wl,
        max_output_wl: args.max_output_wl,
        bin_width: args.bin_width,
        v_size: args.v_size,
        v_outer_max: args.v_outer_max,
    };

    let mut grid = match SynowGrid::from_config(&config) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Grid construction failed: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Output window: {} - {}",
        Angstrom::new(config.min_output_wl),
        Angstrom::new(config.max_output_wl)
    );
    println!(
        "Internal window: {} - {}",
        Angstrom::new(grid.min_wl()),
        Angstrom::new(grid.max_wl())
    );
    println!(
        "Bins: {} wavelength x {} velocity ({} cells)",
        grid.wl_size(),
        grid.v_size(),
        grid.cell_count()
    );

    let setup = Setup::new(args.v_phot, args.v_outer, args.t_phot);
    if let Err(e) = grid.reset(&setup) {
        eprintln!("Reset failed: {e}");
        std::process::exit(1);
    }

    let v = grid.v();
    println!(
        "\nVelocity axis: {:.3} .. {:.3} ({} shells)",
        v[0],
        v[v.len() - 1],
        v.len()
    );

    let model = grid.radiation_model();
    println!("Photosphere: {}", model.temperature());
    if let Some(peak) = model.peak_wavelength() {
        println!("Blackbody peak: {peak}");
    }

    // Populate the leading bins and record the photospheric source function
    let shown = args.show_bins.min(grid.wl_size());
    if shown > 0 {
        println!("\n  Bin | Wavelength (Å) | B_lambda");
        println!("------|----------------|--------------");
    }
    for i in 0..shown {
        let Some(wavelength) = grid.bin_wavelength(i) else {
            break;
        };
        let intensity = grid.radiation_model().intensity(Angstrom::new(wavelength));
        let index = match grid.push_wavelength(wavelength) {
            Ok(index) => index,
            Err(e) => {
                eprintln!("{e}");
                break;
            }
        };
        grid.src_mut().set(index, 0, intensity);
        println!("{index:5} | {wavelength:14.3} | {intensity:12.5e}");
    }

    println!("\nPopulated {} of {} bins", grid.wl_used(), grid.wl_size());
}
