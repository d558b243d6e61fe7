//! Fixtures shared by unit tests.

use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Deterministic rows covering every indicator, both genders, the `5+`
/// sentinel, and a `?` target on every 13th row.
pub(crate) fn synthetic_csv(n: usize) -> String {
    let mut out =
        String::from("eid,vdate,rcount,gender,asthma,pneum,depress,facid,lengthofstay\n");
    for i in 0..n {
        let rcount = i % 7;
        let rcount_text = if rcount >= 5 {
            "5+".to_string()
        } else {
            rcount.to_string()
        };
        let male = i % 3 == 0;
        let asthma = (i / 2) % 2;
        let pneum = (i / 3) % 2;
        let depress = (i / 5) % 2;
        let noise = ((i * 37) % 11) as f64 / 10.0 - 0.5;
        let los = 1.0
            + 1.2 * rcount.min(5) as f64
            + if male { 0.3 } else { 0.0 }
            + 0.8 * asthma as f64
            + 1.1 * pneum as f64
            + 0.6 * depress as f64
            + noise;
        let los_text = if i % 13 == 12 {
            "?".to_string()
        } else {
            format!("{los:.3}")
        };
        let gender = if male { "M" } else { "F" };
        out.push_str(&format!(
            "{i},1/1/2012,{rcount_text},{gender},{asthma},{pneum},{depress},B,{los_text}\n"
        ));
    }
    out
}

/// Writes `content` as `LengthOfStay.csv` inside `dir`.
pub(crate) fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("LengthOfStay.csv");
    let mut f = std::fs::File::create(&path).expect("create dataset file");
    f.write_all(content.as_bytes()).expect("write dataset file");
    path
}
