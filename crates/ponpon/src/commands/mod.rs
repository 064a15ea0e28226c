use std::io::Write;

use anyhow::Result;
use ponpon_app::{CalendarConfig, HabitService};
use ponpon_core::{Clock, StateMedium};
use tracing::debug;

use crate::view;
use crate::{BeliefAction, Command, DoneAction};

pub fn run<M, C>(command: Command, service: &mut HabitService<M, C>, calendar: CalendarConfig, out: &mut impl Write) -> Result<()>
where
    M: StateMedium,
    C: Clock,
{
    debug!(?command, "Running command");
    match command {
        Command::Status => {
            let dashboard = service.dashboard()?;
            write!(out, "{}", view::render_dashboard(&dashboard))?;
        }
        Command::Toggle { category, date } => {
            let outcome = match date {
                Some(date) => service.toggle_on(category, date)?,
                None => service.toggle_today(category)?,
            };
            write!(out, "{}", view::render_toggle(&outcome))?;
        }
        Command::Calendar { month, json } => {
            let calendar_view = service.calendar(month)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&calendar_view)?)?;
            } else {
                write!(out, "{}", view::render_calendar(&calendar_view, calendar.week_starts_on.weekday()))?;
            }
        }
        Command::Day { date } => {
            write!(out, "{}", view::render_day(date, &service.day_status(date)))?;
        }
        Command::Stats { json } => {
            let stats = service.stats()?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                write!(out, "{}", view::render_stats(&stats))?;
            }
        }
        Command::Show => {
            writeln!(out, "{}", serde_json::to_string_pretty(service.record())?)?;
        }
        Command::Belief {
            action: BeliefAction::Add { count },
        } => {
            let total = service.record_beliefs(count)?;
            writeln!(out, "Beliefs extracted so far: {total}")?;
        }
        Command::Emotional { action: DoneAction::Done } => {
            if service.complete_emotional_session()? {
                writeln!(out, "🎉 Emotional session recorded for today.")?;
            } else {
                writeln!(out, "Emotional session already recorded today.")?;
            }
        }
        Command::Onboarding { action: DoneAction::Done } => {
            if service.complete_onboarding()? {
                writeln!(out, "Onboarding complete. Welcome aboard!")?;
            } else {
                writeln!(out, "Onboarding was already completed.")?;
            }
        }
    }
    Ok(())
}
