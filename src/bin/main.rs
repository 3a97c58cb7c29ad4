use chrono::Duration;
use helios_shocks::{DataSet, EventPlotter, ShockList};
use indicatif::ProgressBar;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "shock-plots",
    about = "Plotting Helios data around each cataloged interplanetary shock"
)]
struct Opt {
    /// Measurement table (CSV)
    #[structopt(long, default_value = "helios_data.csv")]
    data: String,
    /// Shock table (CSV)
    #[structopt(long, default_value = "shock_list.csv")]
    shocks: String,
    /// Figure output directory
    #[structopt(short, long, default_value = "Graphs")]
    outdir: String,
    /// Half-width of the plotting window [days]
    #[structopt(short, long, default_value = "3")]
    window: i64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let plotter = EventPlotter::default()
        .outdir(&opt.outdir)
        .half_window(Duration::days(opt.window));
    plotter.create_outdir()?;

    let dataset = DataSet::from_csv(&opt.data, plotter.variable_list())?;
    let shocks = ShockList::from_csv(&opt.shocks)?;
    println!(
        "Plotting {} shock events from {} samples",
        shocks.len(),
        dataset.len()
    );

    let pb = ProgressBar::new(shocks.len() as u64);
    for (index, shock) in shocks.iter().enumerate() {
        plotter.plot(index, shock, &dataset)?;
        pb.inc(1);
    }
    pb.finish();

    Ok(())
}
