use std::io::Write;
use std::path::Path;

use blocks::{gtfs_to_blocks, AgencyConfig, Config, Quiet, ServiceMatch};

const STOPS: &str = "stop_id,stop_name
A,Alpha
B,Beta
C,Gamma
";

const TRIPS: &str = "route_id,service_id,trip_id,trip_headsign,direction_id,block_id
R1,WK,T1,Downtown,0,7
R2,WK,T2,Uptown,1,7
R1,SAT,T3,Downtown,0,8
";

const STOP_TIMES: &str = "trip_id,arrival_time,departure_time,stop_id,stop_sequence
T1,08:00:00,08:00:00,A,1
T1,08:10:00,08:11:00,B,2
T1,08:20:00,08:20:00,C,3
T2,09:00:00,09:00:00,C,1
T2,09:30:00,09:30:00,A,2
T3,10:00:00,10:00:00,A,1
T3,10:10:00,10:10:00,B,2
";

const CALENDAR: &str =
    "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date
WK,1,1,1,1,1,0,0,20240101,20241231
SAT,0,0,0,0,0,1,0,20240101,20241231
";

fn write_feed(dir: &Path, files: &[(&str, &str)]) {
    fs_err::create_dir_all(dir).unwrap();
    for (name, contents) in files {
        fs_err::write(dir.join(name), contents).unwrap();
    }
}

fn config(agencies: Vec<(&str, &Path)>, output: &Path) -> Config {
    Config {
        agencies: agencies
            .into_iter()
            .map(|(key, path)| AgencyConfig {
                agency_key: key.to_string(),
                path: path.display().to_string(),
            })
            .collect(),
        date: Some("20240311".to_string()),
        time_format: "%H:%M:%S".to_string(),
        include_deadheads: true,
        service_match: ServiceMatch::OperatingOnDate,
        output_path: Some(output.display().to_string()),
        overwrite_existing_files: true,
        verbose: false,
    }
}

#[test]
fn writes_blocks_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let feed = tmp.path().join("feed");
    write_feed(
        &feed,
        &[
            ("stops.txt", STOPS),
            ("trips.txt", TRIPS),
            ("stop_times.txt", STOP_TIMES),
            ("calendar.txt", CALENDAR),
        ],
    );
    let output = tmp.path().join("out");

    let (path, stats) = gtfs_to_blocks(&config(vec![("ct", &feed)], &output), &mut Quiet).unwrap();
    assert_eq!(path, output.join("blocks.csv"));
    assert_eq!(stats.trips, 2);
    assert_eq!(stats.segments, 3);
    assert_eq!(stats.blocks, 1);
    assert!(stats.warnings.is_empty());

    let csv = fs_err::read_to_string(&path).unwrap();
    assert_eq!(
        csv,
        "Block ID,Route ID,Trip ID,Direction ID,Days,Departure Location,Arrival Location,Departure Time,Arrival Time,Trip Headsign,Stop Headsign,Is Deadhead
7,R1,T1,0,Mon-Fri,Alpha,Beta,08:00:00,08:10:00,Downtown,,false
7,R1,T1,0,Mon-Fri,Beta,Gamma,08:11:00,08:20:00,Downtown,,false
7,R2,T2,1,Mon-Fri,Gamma,Alpha,09:00:00,09:30:00,Uptown,,false
"
    );
}

#[test]
fn nothing_written_without_service() {
    let tmp = tempfile::tempdir().unwrap();
    let feed = tmp.path().join("feed");
    write_feed(
        &feed,
        &[
            ("stops.txt", STOPS),
            ("trips.txt", TRIPS),
            ("stop_times.txt", STOP_TIMES),
            ("calendar.txt", CALENDAR),
        ],
    );
    let output = tmp.path().join("out");
    let mut config = config(vec![("ct", &feed)], &output);
    config.date = Some("20300101".to_string());

    let err = gtfs_to_blocks(&config, &mut Quiet).unwrap_err();
    assert_eq!(err.to_string(), "No calendars found for Jan 1, 2030");
    assert!(!output.exists());
}

#[test]
fn bad_config_fails_before_loading() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out");
    let mut config = config(vec![("ct", &tmp.path().join("missing"))], &output);
    config.time_format = "%Q".to_string();
    assert!(gtfs_to_blocks(&config, &mut Quiet).is_err());
    assert!(!output.exists());
}

#[test]
fn merges_a_zipped_agency() {
    let tmp = tempfile::tempdir().unwrap();
    let first = tmp.path().join("first");
    write_feed(
        &first,
        &[
            ("stops.txt", STOPS),
            ("trips.txt", TRIPS),
            ("stop_times.txt", STOP_TIMES),
            ("calendar.txt", CALENDAR),
        ],
    );

    let second = tmp.path().join("second.zip");
    let mut zip = zip::ZipWriter::new(fs_err::File::create(&second).unwrap());
    for (name, contents) in [
        ("feed/stops.txt", "stop_id,stop_name\nY,Yonder\n"),
        (
            "feed/trips.txt",
            "route_id,service_id,trip_id,block_id\nX9,EVERY,X1,2\n",
        ),
        (
            "feed/stop_times.txt",
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence\nX1,23:50:00,23:50:00,Y,1\nX1,24:05:00,24:05:00,A,2\n",
        ),
        (
            "feed/calendar.txt",
            "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\nEVERY,1,1,1,1,1,1,1,20240101,20241231\n",
        ),
    ] {
        zip.start_file(name, zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();

    let output = tmp.path().join("out");
    let mut config = config(vec![("ct", &first), ("xt", &second)], &output);
    config.time_format = "%-I:%M %p".to_string();
    let (path, stats) = gtfs_to_blocks(&config, &mut Quiet).unwrap();
    assert_eq!(stats.blocks, 2);

    let csv = fs_err::read_to_string(path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    // Block 2 sorts ahead of block 7
    assert_eq!(
        lines[1],
        "2,X9,X1,,Mon-Sun,Yonder,Alpha,11:50 PM,12:05 AM,,,false"
    );
    assert!(lines[2].starts_with("7,R1,T1,"));
}

#[test]
fn refuses_to_overwrite() {
    let tmp = tempfile::tempdir().unwrap();
    let feed = tmp.path().join("feed");
    write_feed(
        &feed,
        &[
            ("stops.txt", STOPS),
            ("trips.txt", TRIPS),
            ("stop_times.txt", STOP_TIMES),
            ("calendar.txt", CALENDAR),
        ],
    );
    let output = tmp.path().join("out");
    fs_err::create_dir_all(&output).unwrap();
    fs_err::write(output.join("keep.txt"), "mine").unwrap();

    let mut config = config(vec![("ct", &feed)], &output);
    config.overwrite_existing_files = false;
    assert!(gtfs_to_blocks(&config, &mut Quiet).is_err());
    assert!(output.join("keep.txt").exists());
}

#[test]
fn date_pattern_keeps_existing_output() {
    let tmp = tempfile::tempdir().unwrap();
    let feed = tmp.path().join("feed");
    write_feed(
        &feed,
        &[
            ("stops.txt", STOPS),
            ("trips.txt", TRIPS),
            ("stop_times.txt", STOP_TIMES),
            ("calendar.txt", CALENDAR),
        ],
    );
    let output = tmp.path().join("out");
    fs_err::create_dir_all(&output).unwrap();
    fs_err::write(output.join("previous.csv"), "old").unwrap();

    let mut config = config(vec![("ct", &feed)], &output);
    config.time_format = "%Y-%m-%d %H:%M".to_string();
    assert!(config.validate().is_err());
    assert!(gtfs_to_blocks(&config, &mut Quiet).is_err());
    assert!(output.join("previous.csv").exists());
    assert!(!output.join("blocks.csv").exists());
}

#[test]
fn holiday_service_stays_off_ordinary_days() {
    let tmp = tempfile::tempdir().unwrap();
    let feed = tmp.path().join("feed");
    write_feed(
        &feed,
        &[
            ("stops.txt", STOPS),
            (
                "trips.txt",
                "route_id,service_id,trip_id,block_id\nR1,WK,T1,1\nR1,HOLIDAY,H1,9\n",
            ),
            (
                "stop_times.txt",
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence
T1,08:00:00,08:00:00,A,1
T1,08:10:00,08:10:00,B,2
H1,09:00:00,09:00:00,A,1
H1,09:10:00,09:10:00,B,2
",
            ),
            ("calendar.txt", CALENDAR),
            (
                "calendar_dates.txt",
                "service_id,date,exception_type\nHOLIDAY,20240704,1\nHOLIDAY,20241225,1\n",
            ),
        ],
    );
    let output = tmp.path().join("out");
    let mut config = config(vec![("ct", &feed)], &output);
    config.service_match = ServiceMatch::ValidOnDate;
    config.date = Some("20240910".to_string());

    let (path, stats) = gtfs_to_blocks(&config, &mut Quiet).unwrap();
    assert_eq!(stats.trips, 1);
    let csv = fs_err::read_to_string(path).unwrap();
    assert!(!csv.contains(",H1,"));

    config.date = Some("20241225".to_string());
    let (path, stats) = gtfs_to_blocks(&config, &mut Quiet).unwrap();
    assert_eq!(stats.trips, 2);
    let csv = fs_err::read_to_string(path).unwrap();
    assert!(csv.contains("9,R1,H1,,No regular service days,Alpha,Beta,09:00:00,09:10:00,,,false"));
}
