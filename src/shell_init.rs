use clap::{Args, CommandFactory};
use clap_complete::Shell as ClapShell;
use derive_more::derive::{Display, FromStr};
use sprint::config::EXE_NAME;

/// `eval "$(sprint init bash)"` in the shell rc.
#[derive(Clone, Debug, Args)]
pub struct ShellInitArgs {
	shell: Shell,
	/// Skip the `sprint_prompt` function
	#[arg(long)]
	no_prompt: bool,
}

#[derive(Debug, Clone, Copy, Display, FromStr)]
enum Shell {
	Dash,
	Bash,
	Zsh,
	Fish,
}

impl Shell {
	fn aliases(self) -> String {
		let line = |alias: &str, subcommand: &str| match self {
			Shell::Fish => format!("alias {alias} '{EXE_NAME} {subcommand}'"),
			_ => format!("alias {alias}=\"{EXE_NAME} {subcommand}\""),
		};
		[line("sp", "status"), line("spm", "menu"), line("spu", "upcoming")].join("\n")
	}

	/// Prompt segment that stays quiet when the binary fails, e.g. on a broken settings file.
	fn prompt_function(self) -> String {
		match self {
			Shell::Fish => format!("function sprint_prompt\n\t{EXE_NAME} --no-emoji status 2>/dev/null\nend"),
			_ => format!("sprint_prompt() {{\n\t{EXE_NAME} --no-emoji status 2>/dev/null\n}}"),
		}
	}

	fn to_clap_shell(self) -> ClapShell {
		match self {
			Shell::Dash | Shell::Bash => ClapShell::Bash, // dash has no completion system of its own
			Shell::Zsh => ClapShell::Zsh,
			Shell::Fish => ClapShell::Fish,
		}
	}

	fn completions(self) -> String {
		let mut cmd = crate::Cli::command();
		let mut buffer = Vec::new();
		clap_complete::generate(self.to_clap_shell(), &mut cmd, EXE_NAME, &mut buffer);
		String::from_utf8(buffer).unwrap_or_else(|_| String::from("# Failed to generate completions"))
	}
}

pub fn output(args: ShellInitArgs) {
	let shell = args.shell;
	let mut sections = vec![format!("# {EXE_NAME}"), shell.aliases()];
	if !args.no_prompt {
		sections.push(shell.prompt_function());
	}
	sections.push(shell.completions());
	println!("{}", sections.join("\n\n"));
}
