use crate::render::Renderer;
use crate::{execute, Query};
use enade_core::{Dataset, IndexKey, ScoreKind};
use std::io::{self, BufRead, Write};

const MENU: &str = "\
1) Find course
2) List courses by institution
3) List courses by UF
4) List courses by group
5) Scores for course
6) Top N by general score
7) Top N by specific score
8) Dataset summary
0) Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    FindCourse,
    ListByInstitution,
    ListByUf,
    ListByGroup,
    Grades,
    TopGeneral,
    TopSpecific,
    Summary,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim().parse::<u32>().ok()? {
            0 => MenuChoice::Exit,
            1 => MenuChoice::FindCourse,
            2 => MenuChoice::ListByInstitution,
            3 => MenuChoice::ListByUf,
            4 => MenuChoice::ListByGroup,
            5 => MenuChoice::Grades,
            6 => MenuChoice::TopGeneral,
            7 => MenuChoice::TopSpecific,
            8 => MenuChoice::Summary,
            _ => return None,
        };
        Some(choice)
    }
}

enum Arg {
    Value(i64),
    Invalid,
    Eof,
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn read_number<R: BufRead, W: Write>(input: &mut R, out: &mut Renderer<W>, prompt: &str) -> io::Result<Arg> {
    out.prompt(prompt)?;
    let Some(line) = read_line(input)? else { return Ok(Arg::Eof) };
    Ok(match line.trim().parse::<i64>() {
        Ok(v) => Arg::Value(v),
        Err(_) => Arg::Invalid,
    })
}

/// Interactive loop: runs until option 0 or end of input. Bad input is
/// reported and the loop keeps going.
pub fn run<R: BufRead, W: Write>(dataset: &Dataset, mut input: R, out: &mut Renderer<W>) -> io::Result<()> {
    loop {
        out.prompt(&format!("\n{MENU}\nOption: "))?;
        let Some(line) = read_line(&mut input)? else { break };
        let Some(choice) = MenuChoice::parse(&line) else {
            out.message("Invalid option.")?;
            continue;
        };

        let (prompt, build): (&str, fn(i64) -> Query) = match choice {
            MenuChoice::Exit => break,
            MenuChoice::Summary => {
                execute(dataset, Query::Summary, out)?;
                continue;
            }
            MenuChoice::FindCourse => ("Course id: ", Query::Find),
            MenuChoice::ListByInstitution => ("Institution id: ", |v| Query::List(IndexKey::Institution, v)),
            MenuChoice::ListByUf => ("UF code: ", |v| Query::List(IndexKey::Uf, v)),
            MenuChoice::ListByGroup => ("Group code: ", |v| Query::List(IndexKey::Group, v)),
            MenuChoice::Grades => ("Course id: ", Query::Grades),
            MenuChoice::TopGeneral => ("N: ", |v| top(v, ScoreKind::General)),
            MenuChoice::TopSpecific => ("N: ", |v| top(v, ScoreKind::Specific)),
        };

        match read_number(&mut input, out, prompt)? {
            Arg::Value(v) => execute(dataset, build(v), out)?,
            Arg::Invalid => out.message("Invalid number.")?,
            Arg::Eof => break,
        }
    }
    tracing::debug!("menu closed");
    Ok(())
}

// negative counts map to 0, which the ranking rejects
fn top(n: i64, kind: ScoreKind) -> Query {
    Query::Top { n: usize::try_from(n).unwrap_or(0), kind }
}
