//! Interactive session: collect parameters, extract, display, save, repeat.
//!
//! The flow is a small state machine. [`advance`] is the pure transition
//! function; [`run`] drives it against a [`Console`] and a [`Renderer`].

use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::chart::Renderer;
use crate::corpus::Corpus;
use crate::error::{ParamError, Result};
use crate::patterns::{extract, top, FilterConfig, PatternTable};
use crate::report;

const INITIAL_LENGTH_PROMPT: &str = "Enter the initial token length: ";
const NEW_LENGTH_PROMPT: &str = "Enter the new token length: ";
const PERIOD_PROMPT: &str =
    "Do you want to filter out patterns with periods (except at the end)? (y/n): ";
const SPECIAL_PROMPT: &str =
    "Enter any special characters or punctuation marks to filter out (leave empty if none): ";
const SAVE_PROMPT: &str = "Would you like to save the results? (y/n): ";
const CONTINUE_PROMPT: &str =
    "Would you like to change the token length and find more patterns? (y/n): ";
const CONFIRM_EXIT_PROMPT: &str = "Press any key to exit or 'c' to continue: ";
const CONTINUE_SIGNAL: &str = "c";

/// Line-oriented user interaction.
pub trait Console {
    /// Show `question` and read one answer line. `None` means input is closed.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    fn say(&mut self, line: &str) -> Result<()>;
}

/// [`Console`] over any reader/writer pair, usually stdin and stdout.
pub struct StdConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

/// Session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CollectParams,
    Extract,
    OfferSave,
    OfferContinue,
    ConfirmExit,
    Exit,
}

/// Outcome of the work done in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Step completed, or the user answered yes / asked to continue
    Proceed,
    /// The user answered no
    Decline,
    /// Input ended
    Closed,
}

impl From<bool> for Reply {
    fn from(yes: bool) -> Self {
        if yes { Reply::Proceed } else { Reply::Decline }
    }
}

pub fn advance(step: Step, reply: Reply) -> Step {
    match (step, reply) {
        (_, Reply::Closed) => Step::Exit,
        (Step::CollectParams, _) => Step::Extract,
        (Step::Extract, _) => Step::OfferSave,
        (Step::OfferSave, _) => Step::OfferContinue,
        (Step::OfferContinue, Reply::Proceed) => Step::CollectParams,
        (Step::OfferContinue, Reply::Decline) => Step::ConfirmExit,
        (Step::ConfirmExit, Reply::Proceed) => Step::CollectParams,
        (Step::ConfirmExit, Reply::Decline) => Step::Exit,
        (Step::Exit, _) => Step::Exit,
    }
}

/// Everything fixed for the lifetime of a session.
#[derive(Debug)]
pub struct SessionContext {
    pub input_path: PathBuf,
    pub corpus: Corpus,
    pub output_dir: PathBuf,
    pub top_n: usize,
    /// Stem for saved result files, stamped once at startup
    pub date_stem: String,
}

impl SessionContext {
    pub fn new(
        input_path: PathBuf,
        corpus: Corpus,
        output_dir: PathBuf,
        top_n: usize,
        today: NaiveDate,
    ) -> Self {
        Self {
            input_path,
            corpus,
            output_dir,
            top_n,
            date_stem: report::dated_stem(today),
        }
    }
}

/// Parameters chosen in one CollectParams visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    pub token_length: usize,
    pub filter: FilterConfig,
}

#[derive(Debug, Default)]
pub struct SessionOutcome {
    pub extractions: usize,
    pub saved: Vec<PathBuf>,
}

pub fn parse_token_length(raw: &str) -> std::result::Result<usize, ParamError> {
    let raw = raw.trim();
    match raw.parse::<usize>() {
        Ok(0) => Err(ParamError::Zero),
        Ok(n) => Ok(n),
        Err(_) => Err(ParamError::NotANumber(raw.to_string())),
    }
}

pub fn parse_yes(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("y")
}

fn ask_yes_no(console: &mut dyn Console, question: &str) -> Result<Option<bool>> {
    Ok(console.ask(question)?.map(|answer| parse_yes(&answer)))
}

fn collect_params(console: &mut dyn Console, first: bool) -> Result<Option<Params>> {
    let question = if first { INITIAL_LENGTH_PROMPT } else { NEW_LENGTH_PROMPT };
    let token_length = loop {
        let Some(raw) = console.ask(question)? else {
            return Ok(None);
        };
        match parse_token_length(&raw) {
            Ok(n) => break n,
            Err(e) => {
                debug!(input = %raw, "rejected token length");
                console.say(&format!("Invalid token length: {e}"))?;
            }
        }
    };
    let Some(filter_periods) = ask_yes_no(console, PERIOD_PROMPT)? else {
        return Ok(None);
    };
    let Some(special_chars) = console.ask(SPECIAL_PROMPT)? else {
        return Ok(None);
    };
    Ok(Some(Params {
        token_length,
        filter: FilterConfig::new(filter_periods, &special_chars),
    }))
}

fn display(
    ctx: &SessionContext,
    params: &Params,
    table: &PatternTable,
    console: &mut dyn Console,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    let ranked = top(table, ctx.top_n);
    for line in report::top_lines(&ranked, ctx.top_n) {
        console.say(&line)?;
    }
    if ranked.is_empty() {
        console.say(&format!(
            "No patterns found for token length {}.",
            params.token_length
        ))?;
    }
    renderer.render(&ranked)
}

fn save_results(
    ctx: &SessionContext,
    table: &PatternTable,
    console: &mut dyn Console,
) -> Result<PathBuf> {
    let path = report::next_available_path(&ctx.output_dir, &ctx.date_stem);
    report::save(table, &path)?;
    console.say(&format!("Results saved to {}", path.display()))?;
    Ok(path)
}

/// Drive the session until the user exits or input ends.
pub fn run(
    ctx: &SessionContext,
    console: &mut dyn Console,
    renderer: &mut dyn Renderer,
) -> Result<SessionOutcome> {
    console.say(&ctx.corpus.summary())?;

    let mut outcome = SessionOutcome::default();
    let mut params: Option<Params> = None;
    let mut table = PatternTable::new();
    let mut step = Step::CollectParams;

    while step != Step::Exit {
        let reply = match step {
            Step::CollectParams => match collect_params(console, params.is_none())? {
                Some(chosen) => {
                    debug!(?chosen, "parameters collected");
                    params = Some(chosen);
                    Reply::Proceed
                }
                None => Reply::Closed,
            },
            Step::Extract => {
                let Some(current) = params.as_ref() else {
                    warn!("extract requested before parameters were collected");
                    step = Step::CollectParams;
                    continue;
                };
                table = extract(&ctx.corpus.tokens, current.token_length, &current.filter)?;
                outcome.extractions += 1;
                display(ctx, current, &table, console, renderer)?;
                Reply::Proceed
            }
            Step::OfferSave => match ask_yes_no(console, SAVE_PROMPT)? {
                Some(true) => {
                    outcome.saved.push(save_results(ctx, &table, console)?);
                    Reply::Proceed
                }
                Some(false) => Reply::Decline,
                None => Reply::Closed,
            },
            Step::OfferContinue => ask_yes_no(console, CONTINUE_PROMPT)?.map_or(Reply::Closed, Reply::from),
            Step::ConfirmExit => match console.ask(CONFIRM_EXIT_PROMPT)? {
                Some(answer) => Reply::from(answer.trim().eq_ignore_ascii_case(CONTINUE_SIGNAL)),
                None => Reply::Closed,
            },
            Step::Exit => break,
        };

        let next = advance(step, reply);
        debug!(from = ?step, ?reply, to = ?next, "session transition");
        step = next;
    }

    console.say("Exiting the program.")?;
    info!(
        input = %ctx.input_path.display(),
        extractions = outcome.extractions,
        saved = outcome.saved.len(),
        "session finished"
    );
    Ok(outcome)
}
