//! Interactive menu session
//!
//! Walks the forests named on the command line in order. Each one is
//! imported from its record file and then driven from the menu until the
//! user moves to the next forest or exits. End of input counts as exit.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::domain::Forest;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{Console, InfraResult};

pub const MENU_PROMPT: &str =
    "(P)rint, (A)dd, (C)ut, (G)row, (R)eap, (S)ave, (L)oad, (N)ext, e(X)it : ";
const CUT_PROMPT: &str = "Tree number to cut down: ";
const REAP_PROMPT: &str = "Height to reap from: ";
const LOAD_PROMPT: &str = "Enter forest name: ";

/// Menu selection, taken from the first character of the input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Print,
    Add,
    Cut,
    Grow,
    Reap,
    Save,
    Load,
    Next,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn from_token(token: &str) -> Self {
        match token.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('P') => MenuChoice::Print,
            Some('A') => MenuChoice::Add,
            Some('C') => MenuChoice::Cut,
            Some('G') => MenuChoice::Grow,
            Some('R') => MenuChoice::Reap,
            Some('S') => MenuChoice::Save,
            Some('L') => MenuChoice::Load,
            Some('N') => MenuChoice::Next,
            Some('X') => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

/// How a forest's menu loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Exit,
}

pub struct Session<'a, R, W> {
    services: &'a ServiceContainer,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(services: &'a ServiceContainer, console: Console<R, W>) -> Self {
        Self { services, console }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Run the menu over each named forest in turn.
    pub fn run(&mut self, names: &[String]) -> InfraResult<()> {
        self.console.say("Welcome to the Forestry Simulation")?;
        self.console.say("----------------------------------")?;

        for name in names {
            let Some(forest) = self.open(name)? else {
                continue;
            };
            if self.menu(forest)? == Flow::Exit {
                break;
            }
        }

        self.console.say("")?;
        self.console.say("Exiting the Forestry Simulation")?;
        self.console.say("")
    }

    /// Import the forest `name`, reporting problems on the console.
    fn open(&mut self, name: &str) -> InfraResult<Option<Forest>> {
        let importer = &self.services.importer;
        if !importer.source_exists(name) {
            warn!("no record file for {}", name);
            self.console.say(format_args!(
                "Error opening {}",
                importer.source_path(name).display()
            ))?;
            return Ok(None);
        }

        self.console.say(format_args!("Initializing from {}", name))?;
        self.console.say("")?;
        match importer.read_forest(name) {
            Ok(output) => {
                for rejected in &output.rejected {
                    self.console.say(format_args!("Skipping {}", rejected))?;
                }
                info!("opened {} with {} trees", name, output.forest.len());
                Ok(Some(output.forest))
            }
            Err(e) => {
                warn!("import of {} failed: {}", name, e);
                self.console.say(format_args!(
                    "Error opening/reading {}",
                    importer.source_path(name).display()
                ))?;
                Ok(None)
            }
        }
    }

    fn menu(&mut self, mut forest: Forest) -> InfraResult<Flow> {
        loop {
            self.console.prompt(MENU_PROMPT)?;
            let Some(token) = self.console.next_token()? else {
                return Ok(Flow::Exit);
            };
            let choice = MenuChoice::from_token(&token);
            debug!("menu: {:?}", choice);

            match choice {
                MenuChoice::Print => self.console.write(&forest)?,
                MenuChoice::Add => forest.add_random_tree(),
                MenuChoice::Cut => {
                    if !self.cut(&mut forest)? {
                        return Ok(Flow::Exit);
                    }
                }
                MenuChoice::Grow => forest.simulate_yearly_growth(),
                MenuChoice::Reap => {
                    if !self.reap(&mut forest)? {
                        return Ok(Flow::Exit);
                    }
                }
                MenuChoice::Save => self.save(&forest)?,
                MenuChoice::Load => match self.load()? {
                    Some(Some(loaded)) => forest = loaded,
                    Some(None) => {}
                    None => return Ok(Flow::Exit),
                },
                MenuChoice::Next => {
                    self.console.say("Moving to the next forest")?;
                    return Ok(Flow::Next);
                }
                MenuChoice::Exit => return Ok(Flow::Exit),
                MenuChoice::Invalid => {
                    self.console.say("Invalid menu option, try again")?;
                    self.console.say("")?;
                }
            }
        }
    }

    /// Returns `false` when input ran out.
    fn cut(&mut self, forest: &mut Forest) -> InfraResult<bool> {
        loop {
            let Some(number) = self.read_integer(CUT_PROMPT)? else {
                return Ok(false);
            };
            match forest.cut_tree(number) {
                Ok(tree) => {
                    debug!("cut tree {}: {}", number, tree);
                    self.console.say("")?;
                }
                Err(e) => self.console.say(e)?,
            }
            // negative numbers ask again
            if number >= 0 {
                return Ok(true);
            }
        }
    }

    /// Returns `false` when input ran out.
    fn reap(&mut self, forest: &mut Forest) -> InfraResult<bool> {
        let Some(threshold) = self.read_height(REAP_PROMPT)? else {
            return Ok(false);
        };
        for event in forest.reap(threshold) {
            self.console.say(event)?;
        }
        self.console.say("")?;
        Ok(true)
    }

    fn save(&mut self, forest: &Forest) -> InfraResult<()> {
        match self.services.store.save(forest) {
            Ok(path) => self
                .console
                .say(format_args!("Forest saved to {}", path.display())),
            Err(e) => {
                warn!("save failed: {}", e);
                self.console.say(format_args!("Error saving: {}", e))
            }
        }
    }

    /// `None` when input ran out, `Some(None)` when the load failed and the
    /// current forest stays.
    fn load(&mut self) -> InfraResult<Option<Option<Forest>>> {
        self.console.prompt(LOAD_PROMPT)?;
        let Some(name) = self.console.next_token()? else {
            return Ok(None);
        };
        match self.services.store.load(&name) {
            Ok(forest) => {
                self.console.say("Forest loaded successfully.")?;
                Ok(Some(Some(forest)))
            }
            Err(e) => {
                warn!("load of {} failed: {}", name, e);
                self.console.say(e)?;
                self.console.say("Old forest retained")?;
                Ok(Some(None))
            }
        }
    }

    fn read_integer(&mut self, prompt: &str) -> InfraResult<Option<i64>> {
        loop {
            self.console.prompt(prompt)?;
            let Some(token) = self.console.next_token()? else {
                return Ok(None);
            };
            match token.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.console.say("That is not an integer")?,
            }
        }
    }

    fn read_height(&mut self, prompt: &str) -> InfraResult<Option<f64>> {
        loop {
            self.console.prompt(prompt)?;
            let Some(token) = self.console.next_token()? else {
                return Ok(None);
            };
            match token.parse::<f64>() {
                Ok(h) if h.is_finite() && h >= 0.0 => return Ok(Some(h)),
                Ok(_) => self.console.say("Height must be a non-negative number")?,
                Err(_) => self.console.say("That is not a number")?,
            }
        }
    }
}
