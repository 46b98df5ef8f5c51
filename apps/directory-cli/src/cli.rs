//! Command-line parsing for the `directory` binary.

use domain::form::RestaurantForm;
use domain::{Location, RestaurantId};

pub const USAGE: &str = "\
Usage:
  directory list [--json]
  directory show <id> [--json]
  directory add --name <name> --address <addr> --phone <phone> [--phone ..]
                [--tag <tag> ..] [--description <text>] [--rating <0-5>]
                --lat <latitude> --lon <longitude>
  directory edit <id> [same flags as add; given phones/tags replace the old ones]
  directory delete <id>
  directory search <query>
  directory share <id> [--from <lat>,<lon>]

Environment:
  STORAGE_PROVIDER  sqlite (default) | memory
  DB_PATH           SQLite file (default ./data/directory.db)
  ID_STRATEGY       uuid (default) | sequential
  LOG_FORMAT        pretty (default) | json
  RUST_LOG          log filter (default info)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List { json: bool },
    Show { id: RestaurantId, json: bool },
    Add(Fields),
    Edit { id: RestaurantId, fields: Fields },
    Delete { id: RestaurantId },
    Search { query: String },
    Share { id: RestaurantId, from: Option<Location> },
    Help,
}

/// Field flags shared by `add` and `edit`. `None`/empty means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub phones: Vec<String>,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Fields {
    /// Coordinates when both were given.
    pub fn location(&self) -> Result<Option<Location>, String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(Some(Location::new(lat, lon))),
            (None, None) => Ok(None),
            _ => Err("--lat and --lon must be given together".into()),
        }
    }

    /// Overwrite the form with every field that was given.
    pub fn apply(self, form: &mut RestaurantForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(address) = self.address {
            form.address = address;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if !self.phones.is_empty() {
            form.phones.clear();
            for p in &self.phones {
                form.add_phone(p);
            }
        }
        if !self.tags.is_empty() {
            form.tags.clear();
            for t in &self.tags {
                form.add_tag(t);
            }
        }
        if let Some(rating) = self.rating {
            form.rating = rating;
        }
    }
}

pub fn parse<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(cmd) = args.next() else {
        return Ok(Command::Help);
    };
    let rest: Vec<String> = args.collect();

    match cmd.as_str() {
        "list" => Ok(Command::List {
            json: parse_json_flag(&rest)?,
        }),
        "show" => {
            let (id, rest) = split_id(&rest, "show")?;
            Ok(Command::Show {
                id,
                json: parse_json_flag(rest)?,
            })
        }
        "add" => Ok(Command::Add(parse_fields(&rest)?)),
        "edit" => {
            let (id, rest) = split_id(&rest, "edit")?;
            Ok(Command::Edit {
                id,
                fields: parse_fields(rest)?,
            })
        }
        "delete" => {
            let (id, rest) = split_id(&rest, "delete")?;
            if let Some(extra) = rest.first() {
                return Err(format!("unknown argument: {}", extra));
            }
            Ok(Command::Delete { id })
        }
        "search" => Ok(Command::Search {
            query: rest.join(" "),
        }),
        "share" => {
            let (id, rest) = split_id(&rest, "share")?;
            let mut from = None;
            let mut i = 0;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--from" => {
                        let val = value_of(rest, i)?;
                        from = Some(parse_location(val)?);
                        i += 2;
                    }
                    unk => return Err(format!("unknown argument: {}", unk)),
                }
            }
            Ok(Command::Share { id, from })
        }
        "help" | "--help" | "-h" => Ok(Command::Help),
        unk => Err(format!("unknown command: {}", unk)),
    }
}

fn split_id<'a>(rest: &'a [String], cmd: &str) -> Result<(RestaurantId, &'a [String]), String> {
    let Some(raw) = rest.first() else {
        return Err(format!("missing <id> for {}", cmd));
    };
    let id = RestaurantId::new(raw.as_str()).map_err(|e| e.to_string())?;
    Ok((id, &rest[1..]))
}

fn parse_json_flag(rest: &[String]) -> Result<bool, String> {
    let mut json = false;
    for arg in rest {
        match arg.as_str() {
            "--json" => json = true,
            unk => return Err(format!("unknown argument: {}", unk)),
        }
    }
    Ok(json)
}

fn value_of(rest: &[String], i: usize) -> Result<&str, String> {
    rest.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", rest[i]))
}

fn parse_number(flag: &str, val: &str) -> Result<f64, String> {
    let n: f64 = val
        .trim()
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, val))?;
    if !n.is_finite() {
        return Err(format!("{} expects a finite number", flag));
    }
    Ok(n)
}

fn parse_location(val: &str) -> Result<Location, String> {
    let Some((lat, lon)) = val.split_once(',') else {
        return Err(format!("expected <lat>,<lon>, got '{}'", val));
    };
    Ok(Location::new(
        parse_number("--from", lat)?,
        parse_number("--from", lon)?,
    ))
}

fn parse_fields(rest: &[String]) -> Result<Fields, String> {
    let mut fields = Fields::default();
    let mut i = 0;
    while i < rest.len() {
        let flag = rest[i].as_str();
        let val = value_of(rest, i)?;
        match flag {
            "--name" => fields.name = Some(val.to_string()),
            "--address" => fields.address = Some(val.to_string()),
            "--description" => fields.description = Some(val.to_string()),
            "--phone" => fields.phones.push(val.to_string()),
            "--tag" => fields.tags.push(val.to_string()),
            "--rating" => fields.rating = Some(parse_number(flag, val)?),
            "--lat" => fields.latitude = Some(parse_number(flag, val)?),
            "--lon" => fields.longitude = Some(parse_number(flag, val)?),
            unk => return Err(format!("unknown argument: {}", unk)),
        }
        i += 2;
    }
    Ok(fields)
}
