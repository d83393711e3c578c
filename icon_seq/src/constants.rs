pub const INCLUDE_LINE: &str = "#include <cstdint>";

pub const ICON_SEQUENCE_TYPEDEF: &str = "\
typedef struct {
    uint16_t *frames;
    uint16_t width;
    uint16_t height;
    uint16_t count;
} IconSequence;";
