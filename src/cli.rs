use clap::{command, Arg, ArgAction, Command, ValueHint};

pub fn build_command() -> Command {
    command!().args([
        Arg::new("url")
            .short('u')
            .long("url")
            .alias("endpoint")
            .required(false)
            .value_hint(ValueHint::Url)
            .value_name("URL")
            .help("Endpoint that accepts one game per POST."),
        Arg::new("config")
            .short('c')
            .long("config-file")
            .alias("config")
            .required(false)
            .value_hint(ValueHint::FilePath)
            .value_name("PATH")
            .help("Path to a YAML file listing the games to seed."),
        Arg::new("keep_going")
            .short('k')
            .long("keep-going")
            .action(ArgAction::SetTrue)
            .help("Report unreachable-endpoint errors and continue with the next game."),
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Log request bodies."),
    ])
}
