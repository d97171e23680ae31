//! `gap` subprocess client.
//!
//! One GAP session per service. Each request is a GAP statement followed by
//! `Print("@@END@@\n");`; the response is every output line up to the sentinel
//! with GAP's `\`-newline continuations joined. End of output before the
//! sentinel is a `Truncated` error (GAP runs with `--quitonbreak`, so a GAP-side
//! error ends the session the same way).

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{debug, trace};

use super::listing::{parse_bool, parse_list, parse_string, parse_usize};
use super::{GroupHandle, GroupService, ServiceError, SubgroupHandle};

const SENTINEL: &str = "@@END@@";

#[derive(Clone, Debug)]
pub struct GapCfg {
    /// GAP executable, looked up on `PATH` when relative.
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for GapCfg {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gap"),
            args: vec!["-q".into(), "--quitonbreak".into()],
        }
    }
}

pub struct GapService {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    current: Option<(usize, usize)>,
    subgroup_count: Option<usize>,
}

impl GapService {
    pub fn spawn(cfg: &GapCfg) -> Result<Self, ServiceError> {
        let program = cfg.program.display().to_string();
        let mut child = Command::new(&cfg.program)
            .args(&cfg.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ServiceError::Spawn {
                program: program.clone(),
                source,
            })?;
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(ServiceError::Spawn {
                program,
                source: std::io::Error::other("child pipes unavailable"),
            });
        };
        debug!(%program, pid = child.id(), "gap session started");
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            current: None,
            subgroup_count: None,
        })
    }

    /// Send one statement and collect its printed output.
    fn request(&mut self, statement: &str) -> Result<String, ServiceError> {
        trace!(statement, "gap request");
        writeln!(self.stdin, "{statement}")?;
        writeln!(self.stdin, "Print(\"{SENTINEL}\\n\");")?;
        self.stdin.flush()?;

        let mut out = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(ServiceError::Truncated {
                    request: statement.to_owned(),
                });
            }
            let text = line.trim_end_matches(['\n', '\r']);
            if text.trim() == SENTINEL {
                break;
            }
            if text.starts_with("Error,") {
                return Err(ServiceError::Remote(text.to_owned()));
            }
            match text.strip_suffix('\\') {
                Some(head) => out.push_str(head),
                None => {
                    out.push_str(text);
                    out.push(' ');
                }
            }
        }
        Ok(out.trim().to_owned())
    }

    fn check(&self, group: &GroupHandle) -> Result<(), ServiceError> {
        if self.current == Some((group.d, group.k)) {
            Ok(())
        } else {
            Err(ServiceError::StaleHandle {
                d: group.d,
                k: group.k,
            })
        }
    }

    /// GAP list position of `sub`, checked against the enumerated list.
    fn position(&self, sub: &SubgroupHandle) -> Result<usize, ServiceError> {
        let count = self.subgroup_count.unwrap_or(0);
        if sub.index < count {
            Ok(sub.index + 1)
        } else {
            Err(ServiceError::NoSuchSubgroup {
                index: sub.index,
                count,
            })
        }
    }
}

/// Generators acting on 2d points (d points when d != 2k), listed in alphabet
/// order so GAP names them x1, x2[, x3].
fn group_definition(d: usize, k: usize) -> String {
    let cycle = |offset: usize| {
        let pts: Vec<String> = (1..=d).map(|i| (i + offset).to_string()).collect();
        format!("({})", pts.join(","))
    };
    if d == 2 * k {
        let complement: String = (1..=d).map(|i| format!("({},{})", i, i + d)).collect();
        format!(
            "G := Group({}{}, (1,2)({},{}), {});;",
            cycle(0),
            cycle(d),
            d + 1,
            d + 2,
            complement
        )
    } else {
        format!("G := Group({}, (1,2));;", cycle(0))
    }
}

impl GroupService for GapService {
    fn define_group(&mut self, d: usize, k: usize) -> Result<GroupHandle, ServiceError> {
        self.request(&group_definition(d, k))?;
        self.current = Some((d, k));
        self.subgroup_count = None;
        let name = parse_string(&self.request("StructureDescription(G);")?)?;
        let order = parse_usize(&self.request("Size(G);")?)?;
        Ok(GroupHandle { d, k, name, order })
    }

    fn enumerate_subgroups(
        &mut self,
        group: &GroupHandle,
    ) -> Result<Vec<SubgroupHandle>, ServiceError> {
        self.check(group)?;
        self.request("Subs := AllSubgroups(G);;")?;
        let names = parse_list(&self.request("List(Subs, StructureDescription);")?)?;
        let subs = names
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                Ok(SubgroupHandle {
                    index,
                    name: parse_string(raw)?,
                })
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;
        self.subgroup_count = Some(subs.len());
        Ok(subs)
    }

    fn factor_group(&mut self, group: &GroupHandle) -> Result<Vec<String>, ServiceError> {
        self.check(group)?;
        parse_list(&self.request("List(AsList(G), g -> Factorization(G, g));")?)
    }

    fn factor_subgroup(
        &mut self,
        group: &GroupHandle,
        sub: &SubgroupHandle,
    ) -> Result<Vec<String>, ServiceError> {
        self.check(group)?;
        let pos = self.position(sub)?;
        parse_list(&self.request(&format!(
            "List(AsList(Subs[{pos}]), g -> Factorization(G, g));"
        ))?)
    }

    fn is_whole_group(
        &mut self,
        group: &GroupHandle,
        sub: &SubgroupHandle,
    ) -> Result<bool, ServiceError> {
        self.check(group)?;
        let pos = self.position(sub)?;
        parse_bool(&self.request(&format!("Subs[{pos}] = G;"))?)
    }
}

impl Drop for GapService {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "QUIT;");
        let _ = self.stdin.flush();
        if !matches!(self.child.try_wait(), Ok(Some(_))) {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}
