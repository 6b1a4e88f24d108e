//! `agrocast regions` and `agrocast districts`.

use anyhow::{bail, Result};
use clap::Args;

use agrocast_core::{district_options, RegionDistrictMap};

/// `districts` arguments.
#[derive(Args, Debug)]
pub struct DistrictsArgs {
    /// Region to list. Without it every region is listed.
    pub region: Option<String>,

    /// Print the district select control as JSON instead of names.
    #[arg(long)]
    pub json: bool,
}

/// Print region names, one per line.
pub fn run_regions() -> Result<u8> {
    for region in RegionDistrictMap::builtin().regions() {
        println!("{region}");
    }
    Ok(0)
}

/// Print the districts of one region or of all regions.
pub fn run_districts(args: &DistrictsArgs) -> Result<u8> {
    let map = RegionDistrictMap::builtin();
    match &args.region {
        Some(region) if args.json => {
            let control = district_options(map, region);
            println!("{}", serde_json::to_string_pretty(&control)?);
        }
        Some(region) => {
            let Some(districts) = map.lookup(region) else {
                bail!("unknown region: '{region}'");
            };
            for d in districts {
                println!("{d}");
            }
        }
        None => {
            for region in map.regions() {
                println!("{region}:");
                for d in map.lookup(region).unwrap_or_default() {
                    println!("  {d}");
                }
            }
        }
    }
    Ok(0)
}
