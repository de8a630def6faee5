use clap::Parser;
use color_eyre::Result;
use domain::core::StaffX;
use domain::facility::{Facility, FacilityId};
use domain::repository::{FacilityRepository, WorkerRepository};
use domain::worker::{Location, Worker, WorkerId};
use hdrhistogram::Histogram;
use rand::Rng;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "staffx-benchmark")]
#[command(about = "Concurrency benchmark for the StaffX in-memory repositories")]
struct Args {
    /// Number of concurrent threads/clients
    #[arg(short, long, default_value_t = 10)]
    threads: usize,

    /// Duration of the test in seconds
    #[arg(short, long, default_value_t = 30)]
    duration: u64,

    /// Number of workers to seed before the run
    #[arg(long, default_value_t = 1000)]
    seed_workers: usize,

    /// Number of facilities to seed before the run
    #[arg(long, default_value_t = 100)]
    seed_facilities: usize,

    /// Percentage of operations that mutate the stores
    #[arg(long, default_value_t = 20)]
    write_percent: u32,
}

#[derive(Debug)]
struct BenchmarkMetrics {
    pub reads_completed: AtomicU64,
    pub writes_completed: AtomicU64,
    pub lookups_missed: AtomicU64,
    pub latency_histogram: Arc<Mutex<Histogram<u64>>>,
    pub start_time: Instant,
}

impl BenchmarkMetrics {
    fn new() -> Self {
        Self {
            reads_completed: AtomicU64::new(0),
            writes_completed: AtomicU64::new(0),
            lookups_missed: AtomicU64::new(0),
            latency_histogram: Arc::new(Mutex::new(
                Histogram::new_with_bounds(1, 1_000_000, 3).unwrap(),
            )),
            start_time: Instant::now(),
        }
    }

    fn record_read(&self, latency_us: u64) {
        self.reads_completed.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency_us);
    }

    fn record_write(&self, latency_us: u64) {
        self.writes_completed.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency_us);
    }

    fn record_miss(&self) {
        self.lookups_missed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_latency(&self, latency_us: u64) {
        if let Ok(mut hist) = self.latency_histogram.lock() {
            let _ = hist.record(latency_us.max(1));
        }
    }

    fn total_ops(&self) -> u64 {
        self.reads_completed.load(Ordering::Relaxed) + self.writes_completed.load(Ordering::Relaxed)
    }

    fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_ops() as f64 / elapsed
        } else {
            0.0
        }
    }

    fn print_report(&self, staffx: &StaffX) {
        let reads = self.reads_completed.load(Ordering::Relaxed);
        let writes = self.writes_completed.load(Ordering::Relaxed);
        let misses = self.lookups_missed.load(Ordering::Relaxed);
        let elapsed = self.start_time.elapsed().as_secs_f64();

        println!("\n=== STAFFX REPOSITORY BENCHMARK RESULTS ===");
        println!("Test Duration: {:.2} seconds", elapsed);
        println!("Reads Completed: {}", reads);
        println!("Writes Completed: {}", writes);
        println!("Lookups Missed (expected): {}", misses);
        println!("Throughput: {:.2} ops/s", self.get_throughput());
        println!(
            "Final Store Sizes: {} workers, {} facilities",
            staffx.worker_repo.find_all().map_or(0, |w| w.len()),
            staffx.facility_repo.find_all().map_or(0, |f| f.len()),
        );

        if let Ok(hist) = self.latency_histogram.lock() {
            println!("\n=== LATENCY DISTRIBUTION (µs) ===");
            println!("Min: {}", hist.min());
            println!("P50: {}", hist.value_at_quantile(0.50));
            println!("P90: {}", hist.value_at_quantile(0.90));
            println!("P95: {}", hist.value_at_quantile(0.95));
            println!("P99: {}", hist.value_at_quantile(0.99));
            println!("Max: {}", hist.max());
        }
    }
}

struct SeedData {
    worker_ids: Vec<WorkerId>,
    worker_emails: Vec<String>,
    facility_ids: Vec<FacilityId>,
}

const CITIES: [(&str, &str); 4] = [
    ("Austin", "TX"),
    ("Denver", "CO"),
    ("Seattle", "WA"),
    ("Portland", "OR"),
];

fn random_location<R: Rng>(rng: &mut R) -> Location {
    let (city, state) = CITIES[rng.gen_range(0..CITIES.len())];
    Location::new(city.to_string(), state.to_string())
}

fn setup_seed_data(staffx: &StaffX, args: &Args) -> Result<SeedData> {
    info!(
        "Seeding {} workers and {} facilities...",
        args.seed_workers, args.seed_facilities
    );

    let mut rng = rand::thread_rng();
    let mut worker_ids = Vec::with_capacity(args.seed_workers);
    let mut worker_emails = Vec::with_capacity(args.seed_workers);
    for i in 0..args.seed_workers {
        let email = format!("seed_worker_{i}@benchmark.test");
        let worker = Worker::new(
            format!("Seed Worker {i}"),
            email.clone(),
            random_location(&mut rng),
        );
        worker_ids.push(worker.worker_id);
        worker_emails.push(email);
        staffx
            .worker_repo
            .store(worker)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to seed worker {}: {}", i, e))?;
    }

    let mut facility_ids = Vec::with_capacity(args.seed_facilities);
    for i in 0..args.seed_facilities {
        let facility = Facility::new(format!("Seed Facility {i}"), random_location(&mut rng));
        facility_ids.push(facility.facility_id);
        staffx
            .facility_repo
            .store(facility)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to seed facility {}: {}", i, e))?;
    }

    info!("Seeding complete");
    Ok(SeedData {
        worker_ids,
        worker_emails,
        facility_ids,
    })
}

fn benchmark_worker(
    thread_id: usize,
    staffx: Arc<StaffX>,
    seed: Arc<SeedData>,
    metrics: Arc<BenchmarkMetrics>,
    should_stop: Arc<AtomicUsize>,
    write_percent: u32,
) {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::from_entropy();

    info!("Benchmark thread {} started", thread_id);

    let mut created = 0usize;
    while should_stop.load(Ordering::Relaxed) == 0 {
        let roll = rng.gen_range(0..100);
        let started = Instant::now();

        if roll < write_percent {
            // Mutation path: mostly fresh stores, some location updates,
            // the occasional facility registration.
            let write_roll = rng.gen_range(0..100);
            if write_roll < 60 {
                let worker = Worker::new(
                    format!("Bench Worker {thread_id}-{created}"),
                    format!("bench_{thread_id}_{created}@benchmark.test"),
                    random_location(&mut rng),
                );
                created += 1;
                if let Err(e) = staffx.worker_repo.store(worker) {
                    warn!("Thread {} failed to store worker: {}", thread_id, e);
                    continue;
                }
            } else if write_roll < 85 {
                let id = seed.worker_ids[rng.gen_range(0..seed.worker_ids.len())];
                let location = random_location(&mut rng);
                if staffx.worker_repo.update_location(&id, location).is_err() {
                    metrics.record_miss();
                    continue;
                }
            } else {
                let facility =
                    Facility::new(format!("Bench Facility {thread_id}"), random_location(&mut rng));
                if let Err(e) = staffx.facility_repo.store(facility) {
                    warn!("Thread {} failed to store facility: {}", thread_id, e);
                    continue;
                }
            }
            metrics.record_write(started.elapsed().as_micros() as u64);
        } else {
            // Lookup path across both stores, with a slice of deliberate
            // misses to exercise the NotFound branch.
            let read_roll = rng.gen_range(0..100);
            let outcome = if read_roll < 40 {
                let id = seed.worker_ids[rng.gen_range(0..seed.worker_ids.len())];
                staffx.worker_repo.find_by_id(&id).map(|_| ())
            } else if read_roll < 60 {
                let email = &seed.worker_emails[rng.gen_range(0..seed.worker_emails.len())];
                staffx.worker_repo.find_by_email(email).map(|_| ())
            } else if read_roll < 75 {
                let id = seed.facility_ids[rng.gen_range(0..seed.facility_ids.len())];
                staffx.facility_repo.find_by_id(&id).map(|_| ())
            } else if read_roll < 85 {
                staffx.worker_repo.find_all().map(|_| ())
            } else if read_roll < 90 {
                staffx.facility_repo.find_all().map(|_| ())
            } else {
                // Absent key on purpose.
                staffx.worker_repo.find_by_id(&Uuid::new_v4()).map(|_| ())
            };

            if outcome.is_err() {
                metrics.record_miss();
            }
            metrics.record_read(started.elapsed().as_micros() as u64);
        }
    }

    info!("Benchmark thread {} stopped", thread_id);
}

fn run_benchmark(args: Args) -> Result<()> {
    info!(
        "Starting StaffX benchmark with {} threads for {}s",
        args.threads, args.duration
    );

    let staffx = StaffX::new();
    let seed = Arc::new(setup_seed_data(&staffx, &args)?);
    let staffx = Arc::new(staffx);

    let metrics = Arc::new(BenchmarkMetrics::new());
    let should_stop = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for thread_id in 0..args.threads {
        let staffx = Arc::clone(&staffx);
        let seed = Arc::clone(&seed);
        let metrics = Arc::clone(&metrics);
        let should_stop = Arc::clone(&should_stop);
        let write_percent = args.write_percent;
        handles.push(thread::spawn(move || {
            benchmark_worker(thread_id, staffx, seed, metrics, should_stop, write_percent);
        }));
    }

    // Status reporting thread
    let status_handle = {
        let metrics = Arc::clone(&metrics);
        let should_stop = Arc::clone(&should_stop);
        thread::spawn(move || {
            let mut since_report = 0u64;
            while should_stop.load(Ordering::Relaxed) == 0 {
                thread::sleep(Duration::from_secs(1));
                since_report += 1;
                if since_report >= 5 {
                    since_report = 0;
                    info!(
                        "Status: {} reads, {} writes, {:.2} ops/s",
                        metrics.reads_completed.load(Ordering::Relaxed),
                        metrics.writes_completed.load(Ordering::Relaxed),
                        metrics.get_throughput()
                    );
                }
            }
        })
    };

    thread::sleep(Duration::from_secs(args.duration));
    should_stop.store(1, Ordering::Relaxed);

    for handle in handles {
        let _ = handle.join();
    }
    let _ = status_handle.join();

    metrics.print_report(&staffx);

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("benchmark=info".parse()?),
        )
        .init();

    let args = Args::parse();

    info!("StaffX Repository Benchmark");
    info!("Configuration: {:?}", args);

    run_benchmark(args)?;

    Ok(())
}
