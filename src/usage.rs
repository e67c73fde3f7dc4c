/// How to use a generated header in an ESP-IDF project with an I2S amplifier such as the MAX98367A.
#[must_use]
pub fn usage_snippet(header_file: &str, array_name: &str) -> String {
    format!(
        r#"1. Copy {header_file} into the main directory of the firmware project.
2. Include the header:
   #include "{header_file}"
3. Play the audio:

   void play_audio_task(void *pvParameters)
   {{
       i2s_tx_init();
       max98367a_set_gain(2.0f);

       size_t bytes_written;
       esp_err_t ret = i2s_channel_write(tx_handle,
                                         (void*){array_name},
                                         {array_name}_len,
                                         &bytes_written,
                                         portMAX_DELAY);

       if (ret == ESP_OK) {{
           ESP_LOGI("AUDIO", "Playback finished: %d bytes", bytes_written);
       }}

       vTaskDelete(NULL);
   }}
"#
    )
}

#[cfg(test)]
mod tests {
    use crate::usage::usage_snippet;

    #[test]
    fn snippet_names_array() {
        let s = usage_snippet("voice.h", "voice");
        assert!(s.contains("#include \"voice.h\""));
        assert!(s.contains("(void*)voice,"));
        assert!(s.contains("voice_len,"));
        assert!(!s.contains("{{"));
    }
}
