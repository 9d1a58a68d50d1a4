use anyhow::Context;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

use stockscreen_core::app::Dashboard;
use stockscreen_core::domain::period::Period;
use stockscreen_core::domain::recommendation::{InvestmentHorizon, RiskLevel};

use crate::render;

const HELP: &str = "\
commands:
  search <symbol>     look a symbol up
  clear               empty the search box
  select              open the current search result
  chart <period>      price chart for another window (1mo, 6mo, 5y, ...)
  sentiment           fetch AI sentiment for the selected stock
  toggle              show/hide the sentiment panel
  risk <level>        conservative | moderate | aggressive
  horizon <term>      short-term | medium-term | long-term
  recommend           AI recommendation (needs sentiment first)
  show                print all panels
  state               print the dashboard state as JSON
  help                this text
  quit                exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Search(String),
    Clear,
    Select,
    Chart(Period),
    Sentiment,
    Toggle,
    Risk(RiskLevel),
    Horizon(InvestmentHorizon),
    Recommend,
    Show,
    State,
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let cmd = match head.to_ascii_lowercase().as_str() {
            "search" | "s" => ReplCommand::Search(rest.to_string()),
            "clear" => ReplCommand::Clear,
            "select" => ReplCommand::Select,
            "chart" => ReplCommand::Chart(rest.parse()?),
            "sentiment" => ReplCommand::Sentiment,
            "toggle" => ReplCommand::Toggle,
            "risk" => ReplCommand::Risk(rest.parse()?),
            "horizon" => ReplCommand::Horizon(rest.parse()?),
            "recommend" => ReplCommand::Recommend,
            "show" => ReplCommand::Show,
            "state" => ReplCommand::State,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            other => return Err(format!("unknown command {other:?}; type `help`")),
        };
        Ok(cmd)
    }
}

pub async fn run(dash: &mut Dashboard) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match line.parse::<ReplCommand>() {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        if cmd == ReplCommand::Quit {
            break;
        }
        println!("{}", execute(dash, cmd).await?);
    }
    Ok(())
}

/// Flow errors are shown and the session continues.
async fn execute(dash: &mut Dashboard, cmd: ReplCommand) -> anyhow::Result<String> {
    let out = match cmd {
        ReplCommand::Search(query) => {
            dash.search(&query).await;
            render::search(&dash.state().search)
        }
        ReplCommand::Clear => {
            dash.clear_search();
            render::search(&dash.state().search)
        }
        ReplCommand::Select => match dash.select_result().await {
            Ok(_) => render::detail(
                &dash.state().detail,
                (dash.history_period(), dash.state().detail.history()),
            ),
            Err(err) => format!("error: {err}"),
        },
        ReplCommand::Chart(period) => match dash.chart_history(period).await {
            Ok(series) => render::detail(&dash.state().detail, (period, &series)),
            Err(err) => format!("error: {err}"),
        },
        ReplCommand::Sentiment => {
            let _ = dash.load_sentiment().await;
            render::sentiment(&dash.state().sentiment)
        }
        ReplCommand::Toggle => {
            dash.toggle_sentiment();
            render::sentiment(&dash.state().sentiment)
        }
        ReplCommand::Risk(level) => {
            dash.state_mut().set_risk_level(level);
            format!("risk level: {level} ({})", level.describe())
        }
        ReplCommand::Horizon(horizon) => {
            dash.state_mut().set_investment_horizon(horizon);
            format!("investment horizon: {horizon}")
        }
        ReplCommand::Recommend => {
            let _ = dash.recommend().await;
            render::recommendation(&dash.state().recommendation)
        }
        ReplCommand::Show => {
            let state = dash.state();
            format!(
                "{}\n\n{}\n\n{}",
                render::detail(&state.detail, (dash.history_period(), state.detail.history())),
                render::sentiment(&state.sentiment),
                render::recommendation(&state.recommendation)
            )
        }
        ReplCommand::State => {
            serde_json::to_string_pretty(dash.state()).context("failed to serialize state")?
        }
        ReplCommand::Help => HELP.to_string(),
        ReplCommand::Quit => String::new(),
    };
    Ok(out)
}
