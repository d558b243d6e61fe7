//! Predict command implementation
//!
//! Loads the model and dataset once, then answers either a single form
//! given on the command line or an interactive prompt loop.

use crate::error::{CliError, Result};
use colored::Colorize;
use los_model::config::RCOUNT_INPUT_MAX;
use los_model::features::{PatientForm, FEMALE_LABEL, MALE_LABEL, NO_LABEL, YES_LABEL};
use los_model::service::{AppContext, Outcome, ServiceConfig};
use std::io::{self, BufRead, Write};

/// Form values given as flags. All five must be present for a one-shot
/// prediction.
#[derive(Debug, Default)]
pub(crate) struct FormArgs {
    pub(crate) rcount: Option<i64>,
    pub(crate) gender: Option<String>,
    pub(crate) asthma: Option<String>,
    pub(crate) pneum: Option<String>,
    pub(crate) depress: Option<String>,
}

impl FormArgs {
    /// `Ok(None)` when no flag is set, the form when all are set.
    fn into_form(self) -> Result<Option<PatientForm>> {
        match (self.rcount, self.gender, self.asthma, self.pneum, self.depress) {
            (None, None, None, None, None) => Ok(None),
            (Some(rcount), Some(gender), Some(asthma), Some(pneum), Some(depress)) => {
                Ok(Some(PatientForm {
                    rcount,
                    gender,
                    asthma,
                    pneum,
                    depress,
                }))
            }
            _ => Err(CliError::InvalidInput(
                "one-shot prediction needs all of --rcount --gender --asthma --pneum --depress"
                    .to_string(),
            )),
        }
    }
}

/// Run the predict command
pub(crate) fn run(config: &ServiceConfig, args: FormArgs) -> Result<()> {
    let form = args.into_form()?;
    let ctx = AppContext::init(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match form {
        Some(form) => {
            let outcome = ctx.predict(&form)?;
            render_outcome(&outcome, &mut out)?;
        }
        None => {
            let stdin = io::stdin();
            prompt_loop(&ctx, stdin.lock(), &mut out)?;
        }
    }
    Ok(())
}

fn render_outcome<W: Write>(outcome: &Outcome, out: &mut W) -> io::Result<()> {
    match outcome {
        Outcome::Predicted(p) => writeln!(
            out,
            "{} {:.2} days",
            "Predicted length of stay:".green().bold(),
            p.days
        ),
        Outcome::Rejected(rejection) => {
            writeln!(out, "{} {rejection}", "[WARN]".yellow().bold())
        }
    }
}

/// Reads one trimmed line after printing `prompt`. `None` on end of input.
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks for one of `options`; an empty answer picks the first. Other
/// answers pass through unchanged and are encoded by the service.
fn ask_choice<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    field: &str,
    options: [&str; 2],
) -> io::Result<Option<String>> {
    let prompt = format!("{field} [{}/{}]: ", options[0], options[1]);
    Ok(ask(input, out, &prompt)?.map(|answer| {
        if answer.is_empty() {
            options[0].to_string()
        } else {
            answer
        }
    }))
}

/// Interactive form loop. Ends on `q` or end of input.
pub(crate) fn prompt_loop<R: BufRead, W: Write>(ctx: &AppContext, mut input: R, out: &mut W) -> Result<()> {
    writeln!(out, "Length of stay prediction. Enter q to quit.")?;

    loop {
        writeln!(out)?;
        let Some(raw) = ask(&mut input, out, &format!("Diagnosis count (0-{RCOUNT_INPUT_MAX}): "))? else {
            break;
        };
        if raw.eq_ignore_ascii_case("q") {
            break;
        }
        let rcount = match raw.parse::<i64>() {
            Ok(v) if (0..=RCOUNT_INPUT_MAX).contains(&v) => v,
            _ => {
                writeln!(out, "Enter a whole number between 0 and {RCOUNT_INPUT_MAX}.")?;
                continue;
            }
        };

        let Some(gender) = ask_choice(&mut input, out, "Gender", [MALE_LABEL, FEMALE_LABEL])? else {
            break;
        };
        let Some(asthma) = ask_choice(&mut input, out, "Asthma", [NO_LABEL, YES_LABEL])? else {
            break;
        };
        let Some(pneum) = ask_choice(&mut input, out, "Pneumonia", [NO_LABEL, YES_LABEL])? else {
            break;
        };
        let Some(depress) = ask_choice(&mut input, out, "Depression", [NO_LABEL, YES_LABEL])? else {
            break;
        };

        let form = PatientForm {
            rcount,
            gender,
            asthma,
            pneum,
            depress,
        };
        let outcome = ctx.predict(&form)?;
        render_outcome(&outcome, out)?;
    }
    Ok(())
}
