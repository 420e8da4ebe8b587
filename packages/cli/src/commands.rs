//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use accountability_cli_utils::{LoadingSpinner, MultiProgress};
use accountability_ranking::{
    officer_percentiles, rank_officers, score_histogram, tally_counters, top_officer_radar,
};
use accountability_ranking_models::RankedOfficer;
use accountability_records_models::{GeolocatedComplaint, OfficerCounters, RecordId};
use accountability_spatial::{AreaFeature, ComplaintView, count_by_area, parse_area_collection};
use accountability_store::{
    RankingInputs, RecordStore, StoreError, load_geolocated_complaints, load_ranking_inputs,
};

use crate::config::PortalConfig;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Fetches with a spinner; a failure leaves a "failed to load" line and is
/// returned unchanged. Nothing is retried.
async fn with_spinner<T, F>(multi: &MultiProgress, what: &str, fetch: F) -> Result<T, StoreError>
where
    F: std::future::Future<Output = Result<T, StoreError>>,
{
    let spinner = LoadingSpinner::start(multi, &format!("Loading {what}..."));
    match fetch.await {
        Ok(value) => {
            spinner.finish_and_clear();
            Ok(value)
        }
        Err(e) => {
            spinner.finish(&format!("Failed to load {what}"));
            Err(e)
        }
    }
}

async fn load_counters(
    store: &dyn RecordStore,
    config: &PortalConfig,
    multi: &MultiProgress,
) -> Result<(RankingInputs, Vec<OfficerCounters>), StoreError> {
    let inputs = with_spinner(multi, "officer records", load_ranking_inputs(store)).await?;
    let as_of_year = config
        .as_of_year
        .unwrap_or_else(accountability_ranking::current_year);

    let counters = tally_counters(
        &inputs.officers,
        &inputs.allegations,
        &inputs.use_of_force,
        &inputs.awards,
        as_of_year,
    );

    Ok((inputs, counters))
}

async fn load_ranking(
    store: &dyn RecordStore,
    config: &PortalConfig,
    multi: &MultiProgress,
) -> Result<Vec<RankedOfficer>, StoreError> {
    let (inputs, counters) = load_counters(store, config, multi).await?;
    Ok(rank_officers(&inputs.officers, &counters, &config.ranking))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_ranking_table(ranking: &[RankedOfficer]) {
    println!(
        "{:>5} {:<28} {:>7} {:>5} {:>5} {:>5} {:>5} {:>5}",
        "RANK", "OFFICER", "SCORE", "ALG", "CIV", "UOF", "AWD", "SVC"
    );
    println!("{}", "-".repeat(75));
    for entry in ranking {
        let p = &entry.percentiles;
        let flag = if entry.counters.appointment_known {
            ""
        } else {
            " *"
        };
        println!(
            "{:>5} {:<28} {:>7.1} {:>5} {:>5} {:>5} {:>5} {:>5}{flag}",
            entry.rank,
            entry.officer.name,
            entry.composite_score,
            p.officer_allegations,
            p.civilian_allegations,
            p.use_of_force,
            p.awards,
            p.service_years,
        );
    }
    if ranking.iter().any(|r| !r.counters.appointment_known) {
        println!();
        println!("* no appointment date on record; service years counted as 0");
    }
}

/// `rank`
pub async fn rank(
    store: &dyn RecordStore,
    config: &PortalConfig,
    multi: &MultiProgress,
    limit: Option<usize>,
    json: bool,
) -> CommandResult {
    let mut ranking = load_ranking(store, config, multi).await?;
    if let Some(limit) = limit {
        ranking.truncate(limit);
    }

    if json {
        return print_json(&ranking);
    }

    if ranking.is_empty() {
        println!("No officers found.");
    } else {
        print_ranking_table(&ranking);
    }
    Ok(())
}

/// `officer <ID>`
pub async fn officer(
    store: &dyn RecordStore,
    config: &PortalConfig,
    multi: &MultiProgress,
    id: &str,
    json: bool,
) -> CommandResult {
    let (inputs, counters) = load_counters(store, config, multi).await?;
    let Some(entry) =
        officer_percentiles(&inputs.officers, &counters, &RecordId::new(id), &config.ranking)
    else {
        return Err(format!("No officer with id {id}").into());
    };

    if json {
        return print_json(&entry);
    }

    println!(
        "{} (rank {} of {})",
        entry.officer.name,
        entry.rank,
        inputs.officers.len()
    );
    println!("Composite score: {:.1}", entry.composite_score);
    println!();
    for point in accountability_ranking::radar_for(&entry) {
        println!(
            "{:<22} {:>3}  (raw {})",
            point.label,
            point.value,
            entry.counters.get(point.metric)
        );
    }
    Ok(())
}

/// `histogram`
pub async fn histogram(
    store: &dyn RecordStore,
    config: &PortalConfig,
    multi: &MultiProgress,
    bucket_width: Option<f64>,
    json: bool,
) -> CommandResult {
    let ranking = load_ranking(store, config, multi).await?;
    let buckets = score_histogram(
        &ranking,
        bucket_width.unwrap_or(config.histogram.bucket_width),
    )?;

    if json {
        return print_json(&buckets);
    }

    let widest = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bucket in &buckets {
        let bar_len = usize::try_from(bucket.count * 40 / widest).unwrap_or(40);
        println!(
            "{:>5.1}-{:<5.1} {:>6} {}",
            bucket.lower,
            bucket.upper,
            bucket.count,
            "#".repeat(bar_len)
        );
    }
    Ok(())
}

/// `radar`
pub async fn radar(
    store: &dyn RecordStore,
    config: &PortalConfig,
    multi: &MultiProgress,
    json: bool,
) -> CommandResult {
    let ranking = load_ranking(store, config, multi).await?;
    let Some(points) = top_officer_radar(&ranking) else {
        println!("No officers found.");
        return Ok(());
    };

    if json {
        return print_json(&points);
    }

    println!("Top ranked: {}", ranking[0].officer.name);
    for point in &points {
        println!("{:<22} {:>3}", point.label, point.value);
    }
    Ok(())
}

fn read_area(path: &Path) -> Result<AreaFeature, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    AreaFeature::from_geojson_str(&text)
        .map_err(|e| format!("Invalid area in {}: {e}", path.display()).into())
}

fn print_complaints(complaints: &[GeolocatedComplaint]) {
    println!(
        "{:<12} {:<16} {:<12} {:>10} {:>11}",
        "ID", "TRACKING", "DATE", "LAT", "LNG"
    );
    println!("{}", "-".repeat(65));
    for c in complaints {
        println!(
            "{:<12} {:<16} {:<12} {:>10.5} {:>11.5}",
            c.complaint.id,
            c.complaint.tracking_number.as_deref().unwrap_or("-"),
            c.complaint
                .occurred_on
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
            c.latitude,
            c.longitude,
        );
    }
}

/// `filter --area <FILE>`
pub async fn filter(
    store: &dyn RecordStore,
    multi: &MultiProgress,
    area_path: Option<&Path>,
    json: bool,
) -> CommandResult {
    let area = area_path.map(read_area).transpose()?;
    let complaints = with_spinner(multi, "complaints", load_geolocated_complaints(store)).await?;

    let mut view = ComplaintView::new(complaints);
    view.select_area(area.map(Arc::new));
    let filtered = view.filtered();

    if json {
        return print_json(&*filtered);
    }

    print_complaints(&filtered);
    println!();
    println!(
        "{} of {} geolocated complaints",
        filtered.len(),
        view.complaints().len()
    );
    Ok(())
}

/// `areas --areas <FILE>`
pub async fn areas(
    store: &dyn RecordStore,
    multi: &MultiProgress,
    areas_path: &Path,
    json: bool,
) -> CommandResult {
    let text = std::fs::read_to_string(areas_path)?;
    let areas = parse_area_collection(&text)?;
    let complaints = with_spinner(multi, "complaints", load_geolocated_complaints(store)).await?;

    let counts = count_by_area(&complaints, &areas);

    if json {
        return print_json(&counts);
    }

    println!("{:<30} {:>8}", "AREA", "COUNT");
    println!("{}", "-".repeat(40));
    for count in &counts {
        let label = count
            .area_name
            .as_deref()
            .or(count.area_id.as_deref())
            .unwrap_or("<unnamed>");
        println!("{label:<30} {:>8}", count.count);
    }
    Ok(())
}
