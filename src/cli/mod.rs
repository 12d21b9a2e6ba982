use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat session in the terminal
    Chat,

    /// Send a single message and print the reply
    Ask {
        message: String,

        /// Print the reply rendered as HTML instead of raw markdown
        #[arg(long)]
        html: bool,
    },

    /// List the available models grouped by series
    Models,

    /// Serve the chat session over HTTP for a browser front end
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },
}
