use crate::{Error, Prefix, TagList};

/// How a block body is structured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormatKind {
    /// A tag variable list
    Tags,

    /// Bytes with no structure known to this crate
    Opaque,
}

/// A body encoding that can be read from and written to a block
pub trait BodyFormat: Sized {
    /// Interpret a decompressed block body
    fn decode_body(body: &[u8]) -> Result<Self, Error>;

    /// Produce a decompressed block body
    fn encode_body(&self) -> Result<Vec<u8>, Error>;
}

impl BodyFormat for Vec<u8> {
    fn decode_body(body: &[u8]) -> Result<Self, Error> {
        Ok(body.to_vec())
    }

    fn encode_body(&self) -> Result<Vec<u8>, Error> {
        Ok(self.clone())
    }
}

/// A block body decoded according to its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    Tags(TagList),
    Opaque(Vec<u8>),
}

/// The kinds of blocks found in agent files, creature exports, and warp
/// messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `AGNT`: Creatures 3 agent description
    Agent,

    /// `DSAG`: Docking Station agent description
    DockingStationAgent,

    /// `EGGS`: egg agent description
    Eggs,

    /// `DSEX`: creature export description
    CreatureExport,

    /// `CREA`: serialized creature
    Creature,

    /// `GENE`: genome
    Genome,

    /// `GLST`: life history
    History,

    /// `PHOT`: creature photo
    Photo,

    /// `warp`: warp transfer description
    Warp,

    /// `FILE`: embedded dependency file
    File,

    /// `MESG`: in-world message
    Message,

    /// `IMSG`: incoming message
    IncomingMessage,

    /// `OMSG`: outgoing message
    OutgoingMessage,

    /// `CHAT`: chat message
    Chat,

    /// `ICHT`: incoming chat message
    IncomingChat,

    /// `OCHT`: outgoing chat message
    OutgoingChat,

    /// `MOEP`: online presence notice
    Moep,

    /// Any unrecognized prefix
    Other(Prefix),
}

impl BlockKind {
    /// The prefix that identifies this kind on the wire
    pub fn prefix(&self) -> Prefix {
        let data = match self {
            BlockKind::Agent => b"AGNT",
            BlockKind::DockingStationAgent => b"DSAG",
            BlockKind::Eggs => b"EGGS",
            BlockKind::CreatureExport => b"DSEX",
            BlockKind::Creature => b"CREA",
            BlockKind::Genome => b"GENE",
            BlockKind::History => b"GLST",
            BlockKind::Photo => b"PHOT",
            BlockKind::Warp => b"warp",
            BlockKind::File => b"FILE",
            BlockKind::Message => b"MESG",
            BlockKind::IncomingMessage => b"IMSG",
            BlockKind::OutgoingMessage => b"OMSG",
            BlockKind::Chat => b"CHAT",
            BlockKind::IncomingChat => b"ICHT",
            BlockKind::OutgoingChat => b"OCHT",
            BlockKind::Moep => b"MOEP",
            BlockKind::Other(x) => return *x,
        };

        Prefix::new(*data)
    }

    /// How the body of this kind of block is structured
    ///
    /// ```
    /// use prayer::{BlockKind, BodyFormatKind};
    ///
    /// assert_eq!(BlockKind::Agent.body_format(), BodyFormatKind::Tags);
    /// assert_eq!(BlockKind::Genome.body_format(), BodyFormatKind::Opaque);
    /// ```
    pub fn body_format(&self) -> BodyFormatKind {
        match self {
            BlockKind::Agent
            | BlockKind::DockingStationAgent
            | BlockKind::Eggs
            | BlockKind::CreatureExport
            | BlockKind::Warp
            | BlockKind::Message
            | BlockKind::IncomingMessage
            | BlockKind::OutgoingMessage
            | BlockKind::Chat
            | BlockKind::IncomingChat
            | BlockKind::OutgoingChat
            | BlockKind::Moep => BodyFormatKind::Tags,
            BlockKind::Creature
            | BlockKind::Genome
            | BlockKind::History
            | BlockKind::Photo
            | BlockKind::File
            | BlockKind::Other(_) => BodyFormatKind::Opaque,
        }
    }

    /// Whether this kind carries an in-world message
    pub fn is_message(&self) -> bool {
        matches!(
            self,
            BlockKind::Message
                | BlockKind::IncomingMessage
                | BlockKind::OutgoingMessage
                | BlockKind::Chat
                | BlockKind::IncomingChat
                | BlockKind::OutgoingChat
                | BlockKind::Moep
        )
    }
}

impl From<Prefix> for BlockKind {
    fn from(prefix: Prefix) -> Self {
        match prefix.as_bytes() {
            b"AGNT" => BlockKind::Agent,
            b"DSAG" => BlockKind::DockingStationAgent,
            b"EGGS" => BlockKind::Eggs,
            b"DSEX" => BlockKind::CreatureExport,
            b"CREA" => BlockKind::Creature,
            b"GENE" => BlockKind::Genome,
            b"GLST" => BlockKind::History,
            b"PHOT" => BlockKind::Photo,
            b"warp" => BlockKind::Warp,
            b"FILE" => BlockKind::File,
            b"MESG" => BlockKind::Message,
            b"IMSG" => BlockKind::IncomingMessage,
            b"OMSG" => BlockKind::OutgoingMessage,
            b"CHAT" => BlockKind::Chat,
            b"ICHT" => BlockKind::IncomingChat,
            b"OCHT" => BlockKind::OutgoingChat,
            b"MOEP" => BlockKind::Moep,
            _ => BlockKind::Other(prefix),
        }
    }
}
