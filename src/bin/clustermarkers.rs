use clap::Parser;
use errormap::{
    markers_from_reports, ClusterConfig, ClusterList, ErrorFilter, ErrorMapResult, ErrorReport,
    GeoPoint, KmlFile, KmlWriter, System, Viewport, BASE_RADIUS_KM, REFERENCE_DELTA,
};
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fmt::{self, Display},
    path::PathBuf,
};

/*-------------------------------------------------------------------------------------------------
 *                               Parse Command Line Arguments
 *-----------------------------------------------------------------------------------------------*/
///
/// Group reported errors into map clusters.
///
/// This program loads a list of error reports (as returned by the backend for GET /errors),
/// filters them, and groups them into the clusters that would be drawn for a map viewport.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "clustermarkers")]
#[clap(author, version, about)]
struct ClusterMarkersOptionsInit {
    /// The path to a JSON file with the list of error reports.
    reports_file: PathBuf,

    /// Latitude of the viewport center in degrees.
    #[clap(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the viewport center in degrees.
    #[clap(long, allow_hyphen_values = true)]
    lon: f64,

    /// Visible latitude span in degrees.
    #[clap(long, default_value_t = 0.0922)]
    lat_delta: f64,

    /// Visible longitude span in degrees.
    #[clap(long, default_value_t = 0.0421)]
    lon_delta: f64,

    /// Clustering distance in kilometers at the reference latitude span.
    #[clap(long, env = "ERRORMAP_BASE_RADIUS_KM", default_value_t = BASE_RADIUS_KM)]
    base_radius_km: f64,

    /// The reference latitude span in degrees.
    #[clap(long, env = "ERRORMAP_REFERENCE_DELTA", default_value_t = REFERENCE_DELTA)]
    reference_delta: f64,

    /// Only include reports whose title contains this text.
    #[clap(short, long)]
    search: Option<String>,

    /// Only include reports tagged with this system.
    #[clap(long, parse(try_from_str=parse_system))]
    system: Option<System>,

    /// Only include reports tagged with this subsystem.
    #[clap(long)]
    subsystem: Option<String>,

    /// Leave out resolved reports.
    #[clap(short, long)]
    unresolved: bool,

    /// The path to a KML file to write the clusters into.
    #[clap(short, long)]
    kml_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn parse_system(name: &str) -> Result<System, String> {
    System::from_name(name).ok_or_else(|| format!("Argument is not a valid system name: {}", name))
}

#[derive(Debug)]
struct ClusterMarkersOptionsChecked {
    /// The path to the reports file.
    reports_file: PathBuf,

    /// The map region to cluster for.
    viewport: Viewport,

    /// Clustering parameters.
    config: ClusterConfig,

    /// Which reports to include.
    filter: ErrorFilter,

    /// The path to a KML file to produce from this run.
    kml_file: Option<PathBuf>,

    /// Verbose output
    verbose: bool,
}

impl Display for ClusterMarkersOptionsChecked {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "\n")?; // yes, two blank lines.
        writeln!(f, "     Reports: {}", self.reports_file.display())?;
        writeln!(
            f,
            "    Viewport: ({:.6}, {:.6}) span {:.4} x {:.4}",
            self.viewport.center.latitude,
            self.viewport.center.longitude,
            self.viewport.latitude_delta,
            self.viewport.longitude_delta
        )?;
        writeln!(
            f,
            "      Radius: {:.3} km",
            self.config.compute_cluster_radius(self.viewport.latitude_delta)
        )?;
        writeln!(
            f,
            "      Filter: search={:?} system={:?} subsystem={:?} unresolved={}",
            self.filter.search,
            self.filter.system,
            self.filter.subsystem,
            self.filter.unresolved_only
        )?;
        if let Some(ref kml_file) = self.kml_file {
            writeln!(f, "  Output KML: {}", kml_file.display())?;
        }
        writeln!(f, "\n")?; // yes, two blank lines.

        Ok(())
    }
}

/// Get the command line arguments and check them.
///
/// The clustering parameters fall back to environment variables, then to the defaults.
fn parse_args() -> ErrorMapResult<ClusterMarkersOptionsChecked> {
    let ClusterMarkersOptionsInit {
        reports_file,
        lat,
        lon,
        lat_delta,
        lon_delta,
        base_radius_km,
        reference_delta,
        search,
        system,
        subsystem,
        unresolved,
        kml_file,
        verbose,
    } = ClusterMarkersOptionsInit::parse();

    let center = GeoPoint::checked(lat, lon)?;

    if !(lat_delta > 0.0 && lon_delta > 0.0) {
        return Err(format!(
            "Viewport spans must be positive: lat_delta={} lon_delta={}",
            lat_delta, lon_delta
        )
        .into());
    }

    if !(base_radius_km >= 0.0 && reference_delta > 0.0) {
        return Err(format!(
            concat!(
                "Base radius must not be negative and reference delta must be positive:",
                " base_radius_km={} reference_delta={}"
            ),
            base_radius_km, reference_delta
        )
        .into());
    }

    let config = ClusterConfig {
        base_radius_km,
        reference_delta,
        ..ClusterConfig::default()
    };

    let filter = ErrorFilter {
        search,
        system: system.map(|s| s.name().to_owned()),
        subsystem,
        unresolved_only: unresolved,
    };

    let checked = ClusterMarkersOptionsChecked {
        reports_file,
        viewport: Viewport::new(center, lat_delta, lon_delta),
        config,
        filter,
        kml_file,
        verbose,
    };

    Ok(checked)
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> ErrorMapResult<()> {
    let opts = parse_args()?;

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    if opts.verbose {
        info!("{}", opts);
    }

    let system = opts.filter.system.as_deref().and_then(System::from_name);
    if let (Some(sys), Some(sub)) = (system, opts.filter.subsystem.as_deref()) {
        if !sys.has_subsystem(sub) {
            warn!("{} has no subsystem named {}, nothing will match", sys, sub);
        }
    }

    let reports = ErrorReport::load_list(&opts.reports_file)?;
    let selected = opts.filter.apply(&reports);
    let markers = markers_from_reports(selected.iter().copied());

    if opts.verbose {
        info!(
            "{} reports loaded, {} selected, {} placed on the map",
            reports.len(),
            selected.len(),
            markers.len()
        );
    }

    let list = ClusterList::from_markers(&markers, &opts.viewport, &opts.config);

    for (i, clust) in list.clusters.iter().enumerate() {
        let centroid = clust.centroid();
        let titles: Vec<&str> = clust.members().iter().map(|m| m.title.as_str()).collect();
        println!(
            "{:>4} {:>4} ({:>10.6}, {:>11.6}) {}",
            i,
            clust.len(),
            centroid.latitude,
            centroid.longitude,
            titles.join(" | ")
        );
    }

    info!(
        "{} markers in {} clusters, {} visible",
        list.total_markers(),
        list.len(),
        list.visible().count()
    );

    if let Some(ref kml_file) = opts.kml_file {
        let mut kfile = KmlFile::new(kml_file)?;
        kfile.create_icon_style(
            "cluster",
            Some("http://maps.google.com/mapfiles/kml/shapes/caution.png"),
            0.8,
        )?;
        kfile.write_cluster_list(&list, Some("#cluster"))?;
        kfile.finish()?;
    }

    Ok(())
}
