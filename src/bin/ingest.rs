use helios_shocks::{DataLoader, ShockList};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "helios-ingest",
    about = "Merging Helios instrument files and the shock catalogue into CSV tables"
)]
struct Opt {
    /// Path to the instrument file repository
    #[structopt(long, default_value = "Helios")]
    data: String,
    /// Shock catalogue (CSV export)
    #[structopt(long, default_value = "Shock_list_CMEs.csv")]
    shocks: String,
    /// Measurement table output
    #[structopt(long, default_value = "helios_data.csv")]
    out_data: String,
    /// Shock table output
    #[structopt(long, default_value = "shock_list.csv")]
    out_shocks: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let dataset = DataLoader::default().data_path(&opt.data).load()?;
    dataset.summary();
    dataset.to_csv(&opt.out_data)?;
    log::info!("measurement table written to {:?}", opt.out_data);

    let shocks = ShockList::load(&opt.shocks)?;
    println!("SHOCKS: {} events", shocks.len());
    shocks.to_csv(&opt.out_shocks)?;
    log::info!("shock table written to {:?}", opt.out_shocks);

    Ok(())
}
