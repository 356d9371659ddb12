/// A document with a single title element
pub const TITLE_DOCUMENT: &str = "<document><title>This is a document.</title></document>";

/// A document whose items carry a reference attribute and an owner element
pub const ITEM_DOCUMENT: &str =
    "<document><title>This is a document.</title>\
     <item ref='123'><owner>John Doe</owner></item></document>";

/// Three sibling items with reference attributes
pub const REFS_DOCUMENT: &str =
    "<document><item ref='123'/><item ref='456'/><item ref='789'/></document>";

/// Items nested under a container carrying a multiplicator attribute
pub const MULTIPLICATOR_DOCUMENT: &str =
    "<document><items multiplicator='100'>\
     <item value='1'/><item value='2'/><item value='3'/>\
     </items></document>";

/// A playlist with durations and timestamps in several formats
pub const PLAYLIST_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<playlist xmlns="http://example.com/playlist" updated="2024-03-05 14:30:00">
    <name>Road trip</name>
    <created>05.03.2024</created>
    <tracks>
        <track id="1" rating="4.5"><title>Intro</title><length>1:05</length></track>
        <track id="2" rating=""><title>Main theme</title><length>12:34</length></track>
        <track id="3"><title>Outro</title><length></length></track>
    </tracks>
    <notes><![CDATA[<b>bold</b> choice]]></notes>
</playlist>"#;
